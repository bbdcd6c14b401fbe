//! This binary script demonstrates the core DataFrame API.
//!
//! It builds a small example DataFrame, then walks the eager operation
//! surface with the following outline (read in order).
//!   - Imports      = bring engine features into scope
//!   - Constructors = create Series and DataFrames
//!   - Display      = inspect DataFrames
//!   - Getters      = extract typed column slices and cell values
//!   - Projections  = select, drop, rename, and derive columns
//!   - Filters      = keep rows by predicate, mask, or index
//!   - Sorting      = reorder rows by a column
//!   - Aggregation  = summarize by row groups
//!
//! The DataFrames here are deliberately tiny so the printed output is easy
//! to follow; every operation scales to millions of rows unchanged.

/*----------------------------------------------------------------------------
Imports = bring engine features into scope
--------------------------------------------------------------------------- */
use strata::prelude::*;

fn main() -> Result<()> {
    /*------------------------------------------------------------------------
    Constructors = create Series and DataFrames
    ----------------------------------------------------------------------- */
    // A DataFrame is built from equal-length, uniquely named Series.
    // Dictionary-encoded categoricals keep repeated strings compact.
    let df = DataFrame::new(vec![
        Series::new_int64("record", (10..20).collect()),
        Series::new_float64("score", vec![0.0, 1.1, 2.0, 3.3, 1.1, 2.2, 0.5, 3.3, 4.4, 3.3]),
        Series::new_categorical(
            "grade",
            &["lo", "lo", "lo", "hi", "lo", "mid", "lo", "hi", "hi", "hi"],
        ),
    ])?;

    /*------------------------------------------------------------------------
    Display = inspect DataFrames
    ----------------------------------------------------------------------- */
    eprintln!("input{df}");
    eprintln!("shape = {:?}", df.shape());

    /*------------------------------------------------------------------------
    Getters = extract typed column slices and cell values
    ----------------------------------------------------------------------- */
    let scores: &[f64] = df.column_by_name("score")?.float64()?;
    eprintln!("first score = {}", scores[0]);
    eprintln!("grade of row 3 = {:?}", df.column_by_name("grade")?.get_str(3)?);
    eprintln!("categories = {:?}", df.column_by_name("grade")?.categories()?);

    /*------------------------------------------------------------------------
    Projections = select, drop, rename, and derive columns
    ----------------------------------------------------------------------- */
    let projected = df.select(&[col("record"), (col("score") * lit(10.0)).alias("decis")])?;
    eprintln!("projected{projected}");

    let derived = df
        .with_column("pass", &col("score").ge(lit(2.0)))?
        .rename("score", "points")?;
    eprintln!("derived{derived}");

    /*------------------------------------------------------------------------
    Filters = keep rows by predicate, mask, or index
    ----------------------------------------------------------------------- */
    let high = df.filter(&col("score").gt(lit(2.0)).and(col("grade").eq(lit("hi"))))?;
    eprintln!("high scores{high}");

    let first_and_last = df.filter_by_indices(&[0, (df.height() - 1) as u32])?;
    eprintln!("first and last rows{first_and_last}");

    /*------------------------------------------------------------------------
    Sorting = reorder rows by a column
    ----------------------------------------------------------------------- */
    let ranked = df.sort_by("score", false)?;
    eprintln!("ranked{ranked}");

    /*------------------------------------------------------------------------
    Aggregation = summarize by row groups
    ----------------------------------------------------------------------- */
    let summary = df.group_by(&["grade"])?.agg(&[
        col("score").mean().alias("mean_score"),
        col("score").max().alias("best"),
        col("record").count().alias("n"),
    ])?;
    eprintln!("per-grade summary{summary}");

    // describe() gives the per-column numeric overview in one call
    eprintln!("describe{}", df.describe()?);
    Ok(())
}
