//! Row- and column-level DataFrame operations: select, drop, head/tail,
//! sort, the filter family, with_column, rename, and describe.
//!
//! None of these operators mutate the receiver; every call produces a new
//! DataFrame, with columns built in parallel when the cost model says the
//! fan-out pays.

// dependencies
use crate::error::{Result, StrataError};
use crate::exec::columns::build_columns_parallel;
use crate::expr::Expr;
use crate::kernels::compare::indices_from_mask;
use crate::series::Series;
use super::DataFrame;

impl DataFrame {
    /* -----------------------------------------------------------------------------
    projection
    ----------------------------------------------------------------------------- */
    /// Evaluate one expression per output column. A bare `Col(name)` passes
    /// the column through; `AllCols` expands to every column in schema
    /// order; other expressions materialise new columns.
    pub fn select(&self, exprs: &[Expr]) -> Result<DataFrame> {
        let mut expanded: Vec<Expr> = Vec::with_capacity(exprs.len());
        for expr in exprs {
            if matches!(expr, Expr::AllCols) {
                expanded.extend(self.column_names().iter().map(|n| Expr::Col(n.to_string())));
            } else {
                expanded.push(expr.clone());
            }
        }
        let columns =
            build_columns_parallel(expanded.len(), self.height(), |i| expanded[i].evaluate(self))?;
        DataFrame::new(columns)
    }

    /// Schema minus the named columns.
    pub fn drop_columns(&self, names: &[&str]) -> Result<DataFrame> {
        let kept_schema = self.schema().without(names)?;
        let columns = kept_schema
            .names()
            .iter()
            .map(|name| Ok(self.column_by_name(name)?.clone()))
            .collect::<Result<Vec<Series>>>()?;
        DataFrame::new(columns)
    }

    /// Rename one column in the schema; no data is touched.
    pub fn rename(&self, old: &str, new: &str) -> Result<DataFrame> {
        self.schema().renamed(old, new)?; // validation up front
        let columns = self
            .columns()
            .iter()
            .map(|column| {
                if column.name() == old {
                    column.clone().renamed(new)
                } else {
                    column.clone()
                }
            })
            .collect();
        DataFrame::new(columns)
    }

    /// Evaluate `expr`, name the result `name`, and replace the existing
    /// column of that name in place or append at the end of the schema.
    pub fn with_column(&self, name: &str, expr: &Expr) -> Result<DataFrame> {
        let new_column = expr.evaluate(self)?.renamed(name);
        if new_column.len() != self.height() && self.width() > 0 {
            return Err(StrataError::Schema(format!(
                "with_column {name}: length {} does not match height {}",
                new_column.len(), self.height()
            )));
        }
        let mut columns: Vec<Series> = self.columns().to_vec();
        match self.schema().index_of(name) {
            Some(i) => columns[i] = new_column,
            None => columns.push(new_column),
        }
        DataFrame::new(columns)
    }

    /* -----------------------------------------------------------------------------
    row windows
    ----------------------------------------------------------------------------- */
    /// The first `n` rows (bounded by the height).
    pub fn head(&self, n: usize) -> Result<DataFrame> {
        let len = n.min(self.height());
        let columns = build_columns_parallel(self.width(), len, |i| {
            Ok(self.columns()[i].slice_rows(0, len))
        })?;
        DataFrame::new(columns)
    }
    /// The last `n` rows (bounded by the height).
    pub fn tail(&self, n: usize) -> Result<DataFrame> {
        let len = n.min(self.height());
        let offset = self.height() - len;
        let columns = build_columns_parallel(self.width(), len, |i| {
            Ok(self.columns()[i].slice_rows(offset, len))
        })?;
        DataFrame::new(columns)
    }

    /* -----------------------------------------------------------------------------
    sorting
    ----------------------------------------------------------------------------- */
    /// Reorder all rows by the named column: argsort, then gather.
    pub fn sort_by(&self, name: &str, ascending: bool) -> Result<DataFrame> {
        let order = self.column_by_name(name)?.argsort(ascending)?;
        self.take(&order)
    }

    /* -----------------------------------------------------------------------------
    the filter family
    ----------------------------------------------------------------------------- */
    /// Evaluate a predicate expression to a mask, then keep matching rows.
    pub fn filter(&self, predicate: &Expr) -> Result<DataFrame> {
        let mask = predicate.evaluate_predicate(self)?;
        self.filter_by_mask(&mask)
    }

    /// Keep the rows whose mask byte is set. The mask length must equal
    /// the height.
    pub fn filter_by_mask(&self, mask: &[u8]) -> Result<DataFrame> {
        if mask.len() != self.height() {
            return Err(StrataError::Schema(format!(
                "mask length {} does not match height {}", mask.len(), self.height()
            )));
        }
        let indices = indices_from_mask(mask); // sized by count_mask_true
        self.take(&indices)
    }

    /// Keep the rows at the given positions, in the given order. Every
    /// index must be below the height.
    pub fn filter_by_indices(&self, indices: &[u32]) -> Result<DataFrame> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= self.height()) {
            return Err(StrataError::Index(format!(
                "row index {bad} out of bounds for height {}", self.height()
            )));
        }
        self.take(indices)
    }

    // gather all columns by pre-validated row positions, in parallel
    pub(crate) fn take(&self, indices: &[u32]) -> Result<DataFrame> {
        let columns = build_columns_parallel(self.width(), indices.len(), |i| {
            Ok(self.columns()[i].take_u32(indices))
        })?;
        if self.width() == 0 {
            return Ok(DataFrame::empty());
        }
        DataFrame::new(columns)
    }

    /* -----------------------------------------------------------------------------
    summary statistics
    ----------------------------------------------------------------------------- */
    /// Per numeric column: count, sum, min, max, mean, as one row per
    /// statistic with a leading `statistic` label column.
    pub fn describe(&self) -> Result<DataFrame> {
        let numeric: Vec<&Series> = self
            .columns()
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .collect();
        let labels = ["count", "sum", "min", "max", "mean"];
        let mut columns = Vec::with_capacity(numeric.len() + 1);
        columns.push(Series::new_str(
            "statistic",
            &labels,
        ));
        let stat_columns = build_columns_parallel(numeric.len(), self.height(), |i| {
            let column = numeric[i];
            let values = vec![
                column.count() as f64,
                column.sum()?.as_f64().unwrap_or(f64::NAN),
                column.min()?.as_f64().unwrap_or(f64::NAN),
                column.max()?.as_f64().unwrap_or(f64::NAN),
                column.mean()?,
            ];
            Ok(Series::new_float64(column.name(), values))
        })?;
        columns.extend(stat_columns);
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{col, lit};

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new_int64("x", vec![1, 5, 3, 8, 2]),
            Series::new_str("name", &["a", "b", "c", "d", "e"]),
        ])
        .unwrap()
    }

    #[test]
    fn select_with_all_cols_and_projection() {
        let df = sample();
        let all = df.select(&[Expr::AllCols]).unwrap();
        assert!(all.equals(&df));
        let one = df.select(&[col("name")]).unwrap();
        assert_eq!(one.shape(), (5, 1));
        assert!(df.select(&[col("missing")]).is_err());
    }

    #[test]
    fn drop_and_rename() {
        let df = sample();
        let dropped = df.drop_columns(&["name"]).unwrap();
        assert_eq!(dropped.column_names(), vec!["x"]);
        let renamed = df.rename("x", "y").unwrap();
        assert_eq!(renamed.column_names(), vec!["y", "name"]);
        assert!(df.rename("nope", "y").is_err());
    }

    #[test]
    fn head_tail_bounded_by_height() {
        let df = sample();
        assert_eq!(df.head(3).unwrap().height(), 3);
        assert_eq!(df.head(99).unwrap().height(), 5);
        let tail = df.tail(2).unwrap();
        assert_eq!(tail.column_by_name("x").unwrap().int64().unwrap(), &[8, 2]);
    }

    #[test]
    fn sort_by_reorders_all_columns_together() {
        let df = sample().sort_by("x", true).unwrap();
        assert_eq!(df.column_by_name("x").unwrap().int64().unwrap(), &[1, 2, 3, 5, 8]);
        assert_eq!(
            df.column_by_name("name").unwrap().strings().unwrap(),
            &["a", "e", "c", "b", "d"]
        );
    }

    #[test]
    fn filter_keeps_rows_matching_the_predicate() {
        // the pinned scenario: x > 3 keeps (5, "b") and (8, "d")
        let df = sample().filter(&col("x").gt(lit(3))).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column_by_name("x").unwrap().int64().unwrap(), &[5, 8]);
        assert_eq!(df.column_by_name("name").unwrap().strings().unwrap(), &["b", "d"]);
    }

    #[test]
    fn filter_by_mask_validates_length() {
        let df = sample();
        assert!(df.filter_by_mask(&[1, 0]).is_err());
        let filtered = df.filter_by_mask(&[1, 0, 0, 0, 1]).unwrap();
        assert_eq!(filtered.column_by_name("x").unwrap().int64().unwrap(), &[1, 2]);
    }

    #[test]
    fn filter_by_indices_validates_bounds() {
        let df = sample();
        assert!(df.filter_by_indices(&[0, 5]).is_err());
        let taken = df.filter_by_indices(&[4, 0]).unwrap();
        assert_eq!(taken.column_by_name("x").unwrap().int64().unwrap(), &[2, 1]);
    }

    #[test]
    fn with_column_replaces_in_place_or_appends() {
        let df = sample();
        let doubled = df.with_column("x", &(col("x") + col("x"))).unwrap();
        assert_eq!(doubled.column_names(), vec!["x", "name"]);
        assert_eq!(doubled.column_by_name("x").unwrap().int64().unwrap(), &[2, 10, 6, 16, 4]);
        let appended = df.with_column("twice", &(col("x") * lit(2))).unwrap();
        assert_eq!(appended.column_names(), vec!["x", "name", "twice"]);
    }

    #[test]
    fn describe_summarises_numeric_columns() {
        let described = sample().describe().unwrap();
        assert_eq!(described.column_names(), vec!["statistic", "x"]);
        let stats = described.column_by_name("x").unwrap().float64().unwrap();
        assert_eq!(stats[0], 5.0); // count
        assert_eq!(stats[1], 19.0); // sum
        assert_eq!(stats[2], 1.0); // min
        assert_eq!(stats[3], 8.0); // max
        assert_eq!(stats[4], 3.8); // mean
    }

    #[test]
    fn empty_frame_operations_stay_empty() {
        let df = DataFrame::new(vec![Series::new_int64("x", vec![])]).unwrap();
        assert_eq!(df.filter(&col("x").gt(lit(0))).unwrap().height(), 0);
        assert_eq!(df.sort_by("x", true).unwrap().height(), 0);
        assert_eq!(df.head(3).unwrap().height(), 0);
    }
}
