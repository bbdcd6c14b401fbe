//! Element-wise arithmetic kernels: add/sub/mul/div in vector-vector and
//! vector-scalar forms, writing into caller-supplied output buffers.
//!
//! Float division by zero follows IEEE-754 (±inf / NaN); integer division
//! by zero is a kernel error.

// dependencies
use rayon::prelude::*;
use crate::config::EngineConfig;
use crate::error::{Result, StrataError};
use crate::exec::cost::{self, OpKind};
use super::NumericElement;

fn check_lengths(a: usize, b: usize, out: usize, caller: &str) -> Result<()> {
    if a != b || a != out {
        return Err(StrataError::Arity(format!(
            "{caller}: input lengths {a} and {b} with output length {out}"
        )));
    }
    Ok(())
}

// generate vector-vector and vector-scalar kernels for the closed ops
macro_rules! elementwise_kernel {
    ($($name:ident, $scalar_name:ident, $op:ident;)+) => {
        paste::paste! {
            $(
                #[doc = concat!("Vector-vector ", stringify!($op), " into `out`.")]
                pub fn $name<T: NumericElement>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
                    check_lengths(a.len(), b.len(), out.len(), stringify!($name))?;
                    if cost::should_parallelize(OpKind::Elementwise, a.len()) {
                        let morsel = EngineConfig::get().morsel_size;
                        out.par_chunks_mut(morsel)
                            .zip(a.par_chunks(morsel).zip(b.par_chunks(morsel)))
                            .for_each(|(out_chunk, (a_chunk, b_chunk))| {
                                for ((o, &x), &y) in out_chunk.iter_mut().zip(a_chunk).zip(b_chunk) {
                                    *o = x.$op(y);
                                }
                            });
                    } else {
                        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
                            *o = x.$op(y);
                        }
                    }
                    Ok(())
                }
                #[doc = concat!("Vector-scalar ", stringify!($op), " into `out`.")]
                pub fn $scalar_name<T: NumericElement>(a: &[T], scalar: T, out: &mut [T]) -> Result<()> {
                    check_lengths(a.len(), a.len(), out.len(), stringify!($scalar_name))?;
                    for (o, &x) in out.iter_mut().zip(a) {
                        *o = x.$op(scalar);
                    }
                    Ok(())
                }
            )+
        }
    };
}
elementwise_kernel! {
    add, add_scalar, add;
    sub, sub_scalar, sub;
    mul, mul_scalar, mul;
}

/// Vector-vector division into `out`; integer division by zero is a kernel
/// error reported with the offending row.
pub fn div<T: NumericElement>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    check_lengths(a.len(), b.len(), out.len(), "div")?;
    for (i, ((o, &x), &y)) in out.iter_mut().zip(a).zip(b).enumerate() {
        *o = x.checked_div(y).ok_or_else(|| {
            StrataError::Kernel(format!("integer division by zero at row {i}"))
        })?;
    }
    Ok(())
}
/// Vector-scalar division into `out`.
pub fn div_scalar<T: NumericElement>(a: &[T], scalar: T, out: &mut [T]) -> Result<()> {
    check_lengths(a.len(), a.len(), out.len(), "div_scalar")?;
    for (o, &x) in out.iter_mut().zip(a) {
        *o = x.checked_div(scalar).ok_or_else(|| {
            StrataError::Kernel("integer division by zero".to_string())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_vector_arithmetic() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 20.0, 30.0];
        let mut out = [0.0; 3];
        add(&a, &b, &mut out).unwrap();
        assert_eq!(out, [11.0, 22.0, 33.0]);
        sub(&b, &a, &mut out).unwrap();
        assert_eq!(out, [9.0, 18.0, 27.0]);
        mul(&a, &b, &mut out).unwrap();
        assert_eq!(out, [10.0, 40.0, 90.0]);
    }

    #[test]
    fn vector_scalar_arithmetic() {
        let a = [1i64, 2, 3];
        let mut out = [0i64; 3];
        mul_scalar(&a, 4, &mut out).unwrap();
        assert_eq!(out, [4, 8, 12]);
    }

    #[test]
    fn length_mismatch_is_an_arity_error() {
        let mut out = [0.0; 2];
        let result = add(&[1.0, 2.0], &[1.0], &mut out);
        assert!(matches!(result, Err(StrataError::Arity(_))));
    }

    #[test]
    fn float_division_by_zero_follows_ieee() {
        let mut out = [0.0; 3];
        div(&[1.0, -1.0, 0.0], &[0.0, 0.0, 0.0], &mut out).unwrap();
        assert_eq!(out[0], f64::INFINITY);
        assert_eq!(out[1], f64::NEG_INFINITY);
        assert!(out[2].is_nan());
    }

    #[test]
    fn integer_division_by_zero_is_a_kernel_error() {
        let mut out = [0i64; 2];
        let result = div(&[4, 2], &[2, 0], &mut out);
        assert!(matches!(result, Err(StrataError::Kernel(_))));
        div_scalar(&[4, 2], 2, &mut out).unwrap();
        assert_eq!(out, [2, 1]);
    }
}
