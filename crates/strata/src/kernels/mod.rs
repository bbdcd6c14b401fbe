//! Vectorised execution kernels.
//!
//! Every kernel operates on contiguous typed slices (and, where output is
//! required, on caller-supplied output buffers, keeping allocation out of
//! hot loops). The shared contract: deterministic given inputs, panic-free
//! on in-bounds inputs, and identical results across the scalar, SIMD, and
//! parallel paths, modulo IEEE-754 associativity for float reductions.
//!
//! Kernels are dispatched once per column per operation from the Series and
//! DataFrame layers, but remain directly callable on raw slices for
//! collaborators that bypass the column types.

// modules
pub mod compare;
pub mod elementwise;
pub mod gather;
pub mod hash;
pub mod reduce;
pub mod rolling;
pub mod sort;

// dependencies
use std::cmp::Ordering;

/* -----------------------------------------------------------------------------
the ordered-numeric capability bound shared by all numeric kernels
----------------------------------------------------------------------------- */
/// The capability bound for numeric kernel elements: the six numeric dtypes
/// implement it. `ord_cmp` is a total ordering with NaN greater than every
/// finite value, so the sort and min/max kernels agree on float placement.
pub trait NumericElement: Copy + PartialOrd + Default + Send + Sync + 'static {
    const ZERO: Self;
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    /// Division; None signals integer division by zero. Float division by
    /// zero follows IEEE-754 and always returns Some.
    fn checked_div(self, other: Self) -> Option<Self>;
    /// Total ordering with NaN above all finite values.
    fn ord_cmp(self, other: Self) -> Ordering;
    fn to_f64(self) -> f64;
}

macro_rules! impl_float_element {
    ($($prim:ty),+) => {
        $(
            impl NumericElement for $prim {
                const ZERO: Self = 0.0;
                fn add(self, other: Self) -> Self { self + other }
                fn sub(self, other: Self) -> Self { self - other }
                fn mul(self, other: Self) -> Self { self * other }
                fn checked_div(self, other: Self) -> Option<Self> { Some(self / other) }
                fn ord_cmp(self, other: Self) -> Ordering {
                    match (self.is_nan(), other.is_nan()) {
                        (true, true)   => Ordering::Equal,
                        (true, false)  => Ordering::Greater,
                        (false, true)  => Ordering::Less,
                        (false, false) => self.partial_cmp(&other).unwrap_or(Ordering::Equal),
                    }
                }
                fn to_f64(self) -> f64 { self as f64 }
            }
        )+
    };
}
impl_float_element!(f64, f32);

macro_rules! impl_int_element {
    ($($prim:ty),+) => {
        $(
            impl NumericElement for $prim {
                const ZERO: Self = 0;
                fn add(self, other: Self) -> Self { self.wrapping_add(other) }
                fn sub(self, other: Self) -> Self { self.wrapping_sub(other) }
                fn mul(self, other: Self) -> Self { self.wrapping_mul(other) }
                fn checked_div(self, other: Self) -> Option<Self> { self.checked_div(other) }
                fn ord_cmp(self, other: Self) -> Ordering { self.cmp(&other) }
                fn to_f64(self) -> f64 { self as f64 }
            }
        )+
    };
}
impl_int_element!(i64, i32, u64, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_ord_cmp_puts_nan_above_everything() {
        assert_eq!(f64::NAN.ord_cmp(f64::INFINITY), Ordering::Greater);
        assert_eq!((-f64::NAN).ord_cmp(f64::NEG_INFINITY), Ordering::Greater);
        assert_eq!(1.0f64.ord_cmp(f64::NAN), Ordering::Less);
        assert_eq!(f64::NAN.ord_cmp(f64::NAN), Ordering::Equal);
    }

    #[test]
    fn integer_division_by_zero_is_detected() {
        assert_eq!(NumericElement::checked_div(4i64, 0i64), None);
        assert_eq!(NumericElement::checked_div(4.0f64, 0.0f64), Some(f64::INFINITY));
    }
}
