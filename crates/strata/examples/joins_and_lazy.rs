//! This binary script demonstrates the relational surface: the five join
//! modes and the lazy expression layer with its filter-pushdown rewrites.

/*----------------------------------------------------------------------------
Imports
--------------------------------------------------------------------------- */
use strata::prelude::*;

fn main() -> Result<()> {
    // a users dimension and an orders fact table sharing the `id` key
    let users = DataFrame::new(vec![
        Series::new_int64("id", vec![1, 2, 3, 4]),
        Series::new_str("name", &["Ada", "Brin", "Cole", "Dara"]),
    ])?;
    let orders = DataFrame::new(vec![
        Series::new_int64("id", vec![1, 2, 2, 5]),
        Series::new_int64("amount", vec![100, 200, 150, 300]),
    ])?;

    /*------------------------------------------------------------------------
    Joins = combine DataFrames by matching key values
    ----------------------------------------------------------------------- */
    // inner: only matching pairs; a duplicated right key fans out rows
    eprintln!("inner{}", users.inner_join(&orders, &JoinSpec::on(&["id"]))?);

    // left: every user survives, unmatched rows get null order fields
    eprintln!("left{}", users.left_join(&orders, &JoinSpec::on(&["id"]))?);

    // right: every order survives, unmatched rows get null user fields
    eprintln!("right{}", users.right_join(&orders, &JoinSpec::on(&["id"]))?);

    // outer: left join plus the orders no user matched
    eprintln!("outer{}", users.outer_join(&orders, &JoinSpec::on(&["id"]))?);

    // cross: the cartesian product needs no keys at all
    let sizes = DataFrame::new(vec![Series::new_str("size", &["S", "M", "L"])])?;
    let colors = DataFrame::new(vec![Series::new_str("color", &["red", "blue"])])?;
    eprintln!("cross{}", colors.cross_join(&sizes)?);

    // differently named keys and a custom collision suffix
    let accounts = DataFrame::new(vec![
        Series::new_int64("user_id", vec![2, 3]),
        Series::new_str("name", &["acct-b", "acct-c"]),
    ])?;
    let spec = JoinSpec::left_right(&["id"], &["user_id"]).with_suffix("_acct");
    eprintln!("renamed keys{}", users.inner_join(&accounts, &spec)?);

    /*------------------------------------------------------------------------
    Lazy queries = accumulate a plan, let the optimiser rewrite it
    ----------------------------------------------------------------------- */
    // the filter on `amount` references only the right side, so the
    // optimiser moves it below the inner join before execution
    let frame = users
        .clone()
        .lazy()
        .join(orders.clone().lazy(), JoinSpec::on(&["id"]), JoinType::Inner)
        .filter(col("amount").ge(lit(150)))
        .select(vec![col("name"), col("amount")]);
    eprintln!("optimised plan:\n{:?}", frame.clone().optimized_plan()?);
    eprintln!("lazy result{}", frame.collect()?);

    // the same query runs eagerly with identical results
    let eager = users
        .inner_join(&orders, &JoinSpec::on(&["id"]))?
        .filter(&col("amount").ge(lit(150)))?
        .select(&[col("name"), col("amount")])?;
    eprintln!("eager result{eager}");
    Ok(())
}
