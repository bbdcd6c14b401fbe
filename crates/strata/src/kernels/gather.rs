//! The gather kernel: materialise `src[indices[i]]` for each output row.
//! A negative index produces the dtype's zero value and a cleared validity
//! bit, which is how joins emit null rows for unmatched keys.

// dependencies
use rayon::prelude::*;
use crate::bitmap::Bitmap;
use crate::exec::cost::{self, OpKind};

/// Gather rows from `src` by signed index; negative indices yield
/// `T::default()`. Indices must otherwise be in bounds.
pub fn gather<T: Clone + Default + Send + Sync>(src: &[T], indices: &[i32]) -> Vec<T> {
    let take_one = |&i: &i32| {
        if i < 0 {
            T::default()
        } else {
            src[i as usize].clone()
        }
    };
    if cost::should_parallelize(OpKind::Filter, indices.len()) {
        indices.par_iter().map(take_one).collect()
    } else {
        indices.iter().map(take_one).collect()
    }
}

/// The validity of a gathered column: a bit is clear when its index is
/// negative or its source row was null. Returns None when the output is
/// fully dense (no bitmap needed).
pub fn gather_validity(indices: &[i32], src_validity: Option<&Bitmap>) -> Option<Bitmap> {
    let has_negatives = indices.iter().any(|&i| i < 0);
    if !has_negatives && src_validity.is_none() {
        return None;
    }
    let mut validity = Bitmap::new_all_valid(indices.len());
    for (row, &i) in indices.iter().enumerate() {
        let valid = i >= 0 && src_validity.map_or(true, |v| v.get(i as usize));
        if !valid {
            validity.set(row, false);
        }
    }
    Some(validity)
}
