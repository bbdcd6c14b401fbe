//! Sort kernels: `argsort` returns the stable permutation that would sort a
//! slice, `sort_values` returns the sorted copy. Ties are broken by original
//! position; NaN sorts last ascending and first descending, consistent
//! between the two flavours.

// dependencies
use std::cmp::Ordering;
use rayon::prelude::*;
use crate::exec::cost::{self, OpKind};
use super::NumericElement;

/* -----------------------------------------------------------------------------
argsort
----------------------------------------------------------------------------- */
/// The stable permutation that would sort `values`.
pub fn argsort<T: NumericElement>(values: &[T], ascending: bool) -> Vec<u32> {
    let rows: Vec<u32> = (0..values.len() as u32).collect();
    argsort_rows(values, &rows, ascending)
}

/// Stable argsort restricted to the given row positions; used by the Series
/// layer to sort valid rows separately from nulls.
pub fn argsort_rows<T: NumericElement>(values: &[T], rows: &[u32], ascending: bool) -> Vec<u32> {
    argsort_rows_by(rows, ascending, |a, b| {
        values[a as usize].ord_cmp(values[b as usize])
    })
}

/// Stable argsort by an arbitrary row comparator (String, Bool, and
/// Categorical dispatch through here). Descending order reverses the
/// comparator under a stable sort, so ties keep their original positions
/// in both directions.
pub fn argsort_rows_by(
    rows: &[u32], ascending: bool, cmp: impl Fn(u32, u32) -> Ordering + Sync,
) -> Vec<u32> {
    let mut order = rows.to_vec();
    let directed = |a: &u32, b: &u32| {
        if ascending {
            cmp(*a, *b)
        } else {
            cmp(*b, *a)
        }
    };
    if cost::should_parallelize(OpKind::Sort, rows.len()) {
        order.par_sort_by(directed); // parallel merge sort, stable
    } else {
        order.sort_by(directed);
    }
    order
}

/* -----------------------------------------------------------------------------
direct sort
----------------------------------------------------------------------------- */
/// A sorted copy of `values`, agreeing with `argsort` on ordering.
pub fn sort_values<T: NumericElement>(values: &[T], ascending: bool) -> Vec<T> {
    let mut sorted = values.to_vec();
    let directed = |a: &T, b: &T| {
        if ascending {
            a.ord_cmp(*b)
        } else {
            b.ord_cmp(*a)
        }
    };
    if cost::should_parallelize(OpKind::Sort, values.len()) {
        sorted.par_sort_unstable_by(directed);
    } else {
        sorted.sort_unstable_by(directed);
    }
    sorted
}
