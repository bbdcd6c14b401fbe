//! Comparison kernels producing dense byte masks (one 0/1 byte per row),
//! the mask combinators, and the mask→indices compaction kernels.

// dependencies
use crate::error::{Result, StrataError};

fn check_mask_lengths(a: usize, b: usize, out: usize, caller: &str) -> Result<()> {
    if a != b || a != out {
        return Err(StrataError::Arity(format!(
            "{caller}: input lengths {a} and {b} with mask length {out}"
        )));
    }
    Ok(())
}

// the ordering comparisons need PartialOrd; eq/ne only PartialEq
macro_rules! ordering_mask_kernel {
    ($($name:ident, $scalar_name:ident, $op:tt;)+) => {
        $(
            /// Vector-vector comparison to a byte mask.
            pub fn $name<T: PartialOrd>(a: &[T], b: &[T], out: &mut [u8]) -> Result<()> {
                check_mask_lengths(a.len(), b.len(), out.len(), stringify!($name))?;
                for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
                    *o = (x $op y) as u8;
                }
                Ok(())
            }
            /// Vector-scalar comparison to a byte mask.
            pub fn $scalar_name<T: PartialOrd>(a: &[T], scalar: &T, out: &mut [u8]) -> Result<()> {
                check_mask_lengths(a.len(), a.len(), out.len(), stringify!($scalar_name))?;
                for (o, x) in out.iter_mut().zip(a) {
                    *o = (x $op scalar) as u8;
                }
                Ok(())
            }
        )+
    };
}
ordering_mask_kernel! {
    gt_mask, gt_scalar_mask, >;
    ge_mask, ge_scalar_mask, >=;
    lt_mask, lt_scalar_mask, <;
    le_mask, le_scalar_mask, <=;
}

macro_rules! equality_mask_kernel {
    ($($name:ident, $scalar_name:ident, $op:tt;)+) => {
        $(
            /// Vector-vector equality comparison to a byte mask.
            pub fn $name<T: PartialEq>(a: &[T], b: &[T], out: &mut [u8]) -> Result<()> {
                check_mask_lengths(a.len(), b.len(), out.len(), stringify!($name))?;
                for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
                    *o = (x $op y) as u8;
                }
                Ok(())
            }
            /// Vector-scalar equality comparison to a byte mask.
            pub fn $scalar_name<T: PartialEq>(a: &[T], scalar: &T, out: &mut [u8]) -> Result<()> {
                check_mask_lengths(a.len(), a.len(), out.len(), stringify!($scalar_name))?;
                for (o, x) in out.iter_mut().zip(a) {
                    *o = (x $op scalar) as u8;
                }
                Ok(())
            }
        )+
    };
}
equality_mask_kernel! {
    eq_mask, eq_scalar_mask, ==;
    ne_mask, ne_scalar_mask, !=;
}

/* -----------------------------------------------------------------------------
mask combinators (bitwise over byte masks)
----------------------------------------------------------------------------- */
/// Logical AND of two byte masks.
pub fn and_masks(a: &[u8], b: &[u8], out: &mut [u8]) -> Result<()> {
    check_mask_lengths(a.len(), b.len(), out.len(), "and_masks")?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x & y;
    }
    Ok(())
}
/// Logical OR of two byte masks.
pub fn or_masks(a: &[u8], b: &[u8], out: &mut [u8]) -> Result<()> {
    check_mask_lengths(a.len(), b.len(), out.len(), "or_masks")?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x | y;
    }
    Ok(())
}
/// Logical NOT of a byte mask.
pub fn not_mask(a: &[u8], out: &mut [u8]) -> Result<()> {
    check_mask_lengths(a.len(), a.len(), out.len(), "not_mask")?;
    for (o, &x) in out.iter_mut().zip(a) {
        *o = (x == 0) as u8;
    }
    Ok(())
}

/* -----------------------------------------------------------------------------
mask compaction
----------------------------------------------------------------------------- */
/// Compact a byte mask into the densely packed row indices of its set
/// positions.
pub fn indices_from_mask(mask: &[u8]) -> Vec<u32> {
    let mut indices = Vec::with_capacity(count_mask_true(mask));
    for (i, &m) in mask.iter().enumerate() {
        if m != 0 {
            indices.push(i as u32);
        }
    }
    indices
}
/// Popcount of a byte mask.
pub fn count_mask_true(mask: &[u8]) -> usize {
    mask.iter().filter(|&&m| m != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_comparisons_produce_byte_masks() {
        let values = [1i64, 5, 3, 8, 2];
        let mut mask = [0u8; 5];
        gt_scalar_mask(&values, &3, &mut mask).unwrap();
        assert_eq!(mask, [0, 1, 0, 1, 0]);
        le_scalar_mask(&values, &3, &mut mask).unwrap();
        assert_eq!(mask, [1, 0, 1, 0, 1]);
        eq_scalar_mask(&values, &5, &mut mask).unwrap();
        assert_eq!(mask, [0, 1, 0, 0, 0]);
    }

    #[test]
    fn vector_comparisons_and_string_support() {
        let a = ["a".to_string(), "b".to_string()];
        let b = ["b".to_string(), "b".to_string()];
        let mut mask = [0u8; 2];
        lt_mask(&a, &b, &mut mask).unwrap();
        assert_eq!(mask, [1, 0]);
        ne_mask(&a, &b, &mut mask).unwrap();
        assert_eq!(mask, [1, 0]);
    }

    #[test]
    fn nan_comparisons_are_false() {
        let values = [f64::NAN, 1.0];
        let mut mask = [9u8; 2];
        gt_scalar_mask(&values, &0.0, &mut mask).unwrap();
        assert_eq!(mask, [0, 1]);
    }

    #[test]
    fn combinators_are_bitwise() {
        let a = [1u8, 1, 0, 0];
        let b = [1u8, 0, 1, 0];
        let mut out = [0u8; 4];
        and_masks(&a, &b, &mut out).unwrap();
        assert_eq!(out, [1, 0, 0, 0]);
        or_masks(&a, &b, &mut out).unwrap();
        assert_eq!(out, [1, 1, 1, 0]);
        not_mask(&a, &mut out).unwrap();
        assert_eq!(out, [0, 0, 1, 1]);
    }

    #[test]
    fn compaction_matches_popcount() {
        let mask = [0u8, 1, 1, 0, 1];
        assert_eq!(indices_from_mask(&mask), vec![1, 2, 4]);
        assert_eq!(count_mask_true(&mask), 3);
        assert_eq!(indices_from_mask(&[]), Vec::<u32>::new());
    }
}
