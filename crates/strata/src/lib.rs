//! `strata` is an in-memory columnar DataFrame engine for analytical
//! workloads: vectorised filtering, sorting, grouped aggregation, and hash
//! joins over typed column buffers, embedded directly in the host program.
//!
//! Data lives in a [`DataFrame`](frame::DataFrame): a schema plus one typed
//! [`Series`](series::Series) per column, with an optional validity bitmap
//! for nulls and dictionary-encoded categoricals. Operators never mutate
//! their inputs; every transformation yields a new frame.
//!
//! Queries compose either eagerly on the DataFrame methods, or lazily
//! through the expression layer:
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let df = DataFrame::new(vec![
//!     Series::new_str("group", &["a", "a", "b"]),
//!     Series::new_int64("value", vec![1, 2, 3]),
//! ])?;
//!
//! // eager: filter then aggregate
//! let big = df.filter(&col("value").gt(lit(1)))?;
//! let totals = big.group_by(&["group"])?.sum("value")?;
//! assert_eq!(totals.column_by_name("value_sum")?.int64()?, &[2, 3]);
//! # Ok::<(), strata::error::StrataError>(())
//! ```
//!
//! Execution is governed by a process-wide
//! [`EngineConfig`](config::EngineConfig): a cost model picks scalar, SIMD,
//! or parallel kernels per operation, and parallel operators run
//! morsel-based work-stealing over a fixed worker pool with deterministic
//! output order.

// modules
pub mod bitmap;
pub mod config;
pub mod display;
pub mod dtype;
pub mod error;
pub mod exec;
pub mod expr;
pub mod frame;
pub mod kernels;
pub mod schema;
pub mod series;

/// The common imports for working with the engine.
pub mod prelude {
    pub use crate::config::{EngineConfig, SimdLevel};
    pub use crate::dtype::Dtype;
    pub use crate::error::{Result, StrataError};
    pub use crate::expr::lazy::LazyFrame;
    pub use crate::expr::{all_cols, col, lit, AggKind, Expr};
    pub use crate::frame::join::{JoinSpec, JoinType};
    pub use crate::frame::DataFrame;
    pub use crate::schema::{Field, Schema};
    pub use crate::series::{AnyValue, Series};
}
