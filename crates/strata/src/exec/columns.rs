//! Parallel column materialisation: one task per output column when the
//! frame is wide enough and tall enough to pay for the fan-out, preserving
//! the output column order either way.

// dependencies
use rayon::prelude::*;
use crate::error::Result;
use crate::exec::cost::{self, OpKind};
use crate::series::Series;

/// Build `n_columns` Series by index. Runs one rayon task per column when
/// `n_columns > 1` and `n_rows` exceeds the elementwise parallel threshold;
/// otherwise builds serially. Output order matches the index order.
pub fn build_columns_parallel<F>(n_columns: usize, n_rows: usize, build: F) -> Result<Vec<Series>>
where
    F: Fn(usize) -> Result<Series> + Send + Sync,
{
    if n_columns > 1 && cost::should_parallelize(OpKind::Elementwise, n_rows) {
        (0..n_columns).into_par_iter().map(build).collect()
    } else {
        (0..n_columns).map(build).collect()
    }
}
