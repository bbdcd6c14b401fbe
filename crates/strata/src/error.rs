//! Error types surfaced by all fallible engine operations.
//!
//! Every transformation returns either a new value or a `StrataError`;
//! errors never silently coerce data. Aggregations over empty inputs
//! return the dtype's identity value, which is a value, not an error.

// dependencies
use thiserror::Error;

/// The error enumeration for all engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrataError {
    /// Duplicate column names, column not found, or column length mismatch.
    #[error("schema error: {0}")]
    Schema(String),

    /// Mismatched argument counts, e.g., `left_on` vs. `right_on` arity.
    #[error("arity error: {0}")]
    Arity(String),

    /// An unusable join specification.
    #[error("join spec error: {0}")]
    JoinSpec(String),

    /// An operation applied to a column of an unsupported dtype.
    #[error("type error: {0}")]
    Type(String),

    /// A row or column index out of bounds.
    #[error("index error: {0}")]
    Index(String),

    /// A kernel-level failure, e.g., integer division by zero.
    #[error("kernel error: {0}")]
    Kernel(String),

    /// A value that cannot be parsed as the declared dtype.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StrataError>;

impl StrataError {
    /// Standard error for a column name that is absent from a schema.
    pub fn column_not_found(caller: &str, name: &str) -> Self {
        StrataError::Schema(format!("DataFrame::{caller}: column {name} not found"))
    }
}
