//! The cost model: decides per operation whether to run scalar, SIMD, or
//! parallel, by consulting the configured per-operation row thresholds.

// dependencies
use crate::config::{EngineConfig, SimdLevel};

/// The operation tags the cost model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Reduce,
    Elementwise,
    Filter,
    Sort,
    JoinBuild,
    JoinProbe,
    GroupBy,
}

/// The execution path chosen for one operation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecPath {
    Scalar,
    Simd,
    Parallel,
}

// below this row count vectorisation overhead is not worth paying
const SIMD_MIN_ROWS: usize = 64;

/// The configured parallel threshold for an operation tag.
pub fn parallel_threshold(op: OpKind) -> usize {
    let thresholds = &EngineConfig::get().min_rows_for_parallel;
    match op {
        OpKind::Reduce      => thresholds.reduce,
        OpKind::Elementwise => thresholds.elementwise,
        OpKind::Filter      => thresholds.filter,
        OpKind::Sort        => thresholds.sort,
        OpKind::JoinBuild   => thresholds.join_build,
        OpKind::JoinProbe   => thresholds.join_probe,
        OpKind::GroupBy     => thresholds.group_by,
    }
}

/// Whether `rows` is large enough for the parallel path of `op`. A single
/// configured worker disables parallelism outright.
pub fn should_parallelize(op: OpKind, rows: usize) -> bool {
    EngineConfig::get().worker_count > 1 && rows >= parallel_threshold(op)
}

/// Choose the execution path for one operation instance.
pub fn decide(op: OpKind, rows: usize) -> ExecPath {
    if should_parallelize(op, rows) {
        ExecPath::Parallel
    } else if EngineConfig::get().simd_level != SimdLevel::Scalar && rows >= SIMD_MIN_ROWS {
        ExecPath::Simd
    } else {
        ExecPath::Scalar
    }
}
