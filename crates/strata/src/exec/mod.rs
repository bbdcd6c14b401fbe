//! The cost model and parallel scheduler: per-operation path selection,
//! morsel-based work-stealing, and parallel column materialisation.

// modules
pub mod columns;
pub mod cost;
pub mod morsel;
