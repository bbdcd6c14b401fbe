//! Reduction kernels: sum, min, max, mean, variance family, order
//! statistics, and count_true.
//!
//! The public entry points consult the cost model and route to the scalar,
//! SIMD, or parallel implementation; the per-path functions are public so
//! equivalence tests can pin them against each other. Empty input returns
//! the reduction's identity (0 for sum/count, None for min/max, NaN for the
//! mean/variance family).

// dependencies
use rayon::prelude::*;
use crate::config::EngineConfig;
use crate::error::{Result, StrataError};
use crate::exec::cost::{self, ExecPath, OpKind};
use super::NumericElement;

// lane count for the unrolled accumulators; wide enough for one AVX-512
// register of f64
const LANES: usize = 8;

/* -----------------------------------------------------------------------------
sum
----------------------------------------------------------------------------- */
/// Sum with cost-model path selection.
pub fn sum<T: NumericElement>(values: &[T]) -> T {
    match cost::decide(OpKind::Reduce, values.len()) {
        ExecPath::Scalar   => sum_scalar(values),
        ExecPath::Simd     => sum_simd(values),
        ExecPath::Parallel => sum_parallel(values),
    }
}
/// Straight-line scalar sum.
pub fn sum_scalar<T: NumericElement>(values: &[T]) -> T {
    values.iter().fold(T::ZERO, |acc, &v| acc.add(v))
}
/// Lane-blocked sum: eight independent accumulators the optimizer folds
/// into vector registers.
pub fn sum_simd<T: NumericElement>(values: &[T]) -> T {
    let mut lanes = [T::ZERO; LANES];
    let chunks = values.chunks_exact(LANES);
    let tail = chunks.remainder();
    for chunk in chunks {
        for (lane, &v) in lanes.iter_mut().zip(chunk) {
            *lane = lane.add(v);
        }
    }
    let mut acc = lanes.iter().fold(T::ZERO, |acc, &lane| acc.add(lane));
    for &v in tail {
        acc = acc.add(v);
    }
    acc
}
/// Chunked parallel sum; float results may differ from the scalar path in
/// the low bits by associativity.
pub fn sum_parallel<T: NumericElement>(values: &[T]) -> T {
    let partials: Vec<T> = values
        .par_chunks(EngineConfig::get().morsel_size)
        .map(sum_simd)
        .collect();
    sum_scalar(&partials)
}

/* -----------------------------------------------------------------------------
min and max
----------------------------------------------------------------------------- */
/// Minimum under the total order (NaN above all values); None when empty.
pub fn min<T: NumericElement>(values: &[T]) -> Option<T> {
    match cost::decide(OpKind::Reduce, values.len()) {
        ExecPath::Parallel => values
            .par_chunks(EngineConfig::get().morsel_size)
            .filter_map(min_scalar)
            .min_by(|a, b| a.ord_cmp(*b)),
        _ => min_scalar(values),
    }
}
/// Maximum under the total order (NaN above all values); None when empty.
pub fn max<T: NumericElement>(values: &[T]) -> Option<T> {
    match cost::decide(OpKind::Reduce, values.len()) {
        ExecPath::Parallel => values
            .par_chunks(EngineConfig::get().morsel_size)
            .filter_map(max_scalar)
            .max_by(|a, b| a.ord_cmp(*b)),
        _ => max_scalar(values),
    }
}
/// Serial minimum.
pub fn min_scalar<T: NumericElement>(values: &[T]) -> Option<T> {
    values.iter().copied().min_by(|a, b| a.ord_cmp(*b))
}
/// Serial maximum.
pub fn max_scalar<T: NumericElement>(values: &[T]) -> Option<T> {
    values.iter().copied().max_by(|a, b| a.ord_cmp(*b))
}

/* -----------------------------------------------------------------------------
mean and the variance family
----------------------------------------------------------------------------- */
/// Arithmetic mean; NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}
/// Sample variance with the N-1 convention via Welford's online algorithm;
/// NaN for fewer than two elements.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mut mean_acc = 0.0;
    let mut m2 = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let delta = v - mean_acc;
        mean_acc += delta / (i + 1) as f64;
        m2 += delta * (v - mean_acc);
    }
    m2 / (values.len() - 1) as f64
}
/// Sample standard deviation (N-1); NaN for fewer than two elements.
pub fn stddev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}
/// Fisher-Pearson skewness g1; NaN for fewer than three elements or zero
/// spread.
pub fn skewness(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return f64::NAN;
    }
    let (m2, m3, _) = central_moments(values);
    m3 / m2.powf(1.5)
}
/// Excess kurtosis g2; NaN for fewer than four elements or zero spread.
pub fn kurtosis(values: &[f64]) -> f64 {
    if values.len() < 4 {
        return f64::NAN;
    }
    let (m2, _, m4) = central_moments(values);
    m4 / (m2 * m2) - 3.0
}
fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mu = mean(values);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mu;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}
/// Pearson correlation of two equal-length slices; NaN for fewer than two
/// elements or zero variance on either side.
pub fn correlation(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(StrataError::Arity(format!(
            "correlation inputs have different lengths: {} vs {}", a.len(), b.len()
        )));
    }
    if a.len() < 2 {
        return Ok(f64::NAN);
    }
    let n = a.len() as f64;
    let mean_a = mean(a);
    let mean_b = mean(b);
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    Ok(cov / n / ((var_a / n).sqrt() * (var_b / n).sqrt()))
}

/* -----------------------------------------------------------------------------
order statistics
----------------------------------------------------------------------------- */
/// Median with midpoint interpolation for even lengths; NaN when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.ord_cmp(*b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
/// Quantile `q` in [0, 1] with linear interpolation between order
/// statistics; NaN when empty.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StrataError::Kernel(format!("quantile {q} outside [0, 1]")));
    }
    if values.is_empty() {
        return Ok(f64::NAN);
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.ord_cmp(*b));
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/* -----------------------------------------------------------------------------
boolean reductions
----------------------------------------------------------------------------- */
/// Number of true elements.
pub fn count_true(values: &[bool]) -> usize {
    values.iter().filter(|&&v| v).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn close(a: f64, b: f64) -> bool {
        if b == 0.0 {
            a.abs() < TOLERANCE
        } else {
            ((a - b) / b).abs() < TOLERANCE
        }
    }

    #[test]
    fn sum_paths_agree_within_tolerance() {
        let values: Vec<f64> = (0..10_000).map(|i| (i as f64).sin()).collect();
        let scalar = sum_scalar(&values);
        assert!(close(sum_simd(&values), scalar));
        assert!(close(sum_parallel(&values), scalar));
    }

    #[test]
    fn integer_sum_paths_agree_exactly() {
        let values: Vec<i64> = (0..100_000).collect();
        assert_eq!(sum_scalar(&values), sum_simd(&values));
        assert_eq!(sum_scalar(&values), sum_parallel(&values));
        assert_eq!(sum_scalar(&values), 100_000 * 99_999 / 2);
    }

    #[test]
    fn empty_input_identities() {
        assert_eq!(sum_scalar::<f64>(&[]), 0.0);
        assert_eq!(min_scalar::<i64>(&[]), None);
        assert!(mean(&[]).is_nan());
        assert!(variance(&[1.0]).is_nan());
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn min_max_place_nan_above_finite_values() {
        let values = [1.0, f64::NAN, -3.0];
        assert_eq!(min_scalar(&values), Some(-3.0));
        assert!(max_scalar(&values).unwrap().is_nan());
    }

    #[test]
    fn variance_and_stddev_use_the_sample_convention() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(variance(&values), 4.571428571428571));
        assert!(close(stddev(&values), 4.571428571428571f64.sqrt()));
    }

    #[test]
    fn median_and_quantile_interpolate() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5).unwrap(), 2.5);
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.0).unwrap(), 1.0);
        assert!(quantile(&[1.0], 1.5).is_err());
    }

    #[test]
    fn skewness_and_kurtosis_moments() {
        // symmetric data has zero skewness
        let symmetric = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&symmetric).abs() < TOLERANCE);
        // uniform-ish data has negative excess kurtosis
        assert!(kurtosis(&symmetric) < 0.0);
        // right-skewed data
        assert!(skewness(&[1.0, 1.0, 1.0, 10.0]) > 0.0);
        // degenerate inputs
        assert!(skewness(&[1.0, 2.0]).is_nan());
        assert!(kurtosis(&[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn correlation_of_a_line_is_one() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let b: Vec<f64> = a.iter().map(|x| 3.0 * x + 1.0).collect();
        assert!(close(correlation(&a, &b).unwrap(), 1.0));
        assert!(correlation(&a, &b[..50]).is_err());
    }

    #[test]
    fn count_true_is_the_popcount() {
        assert_eq!(count_true(&[true, false, true, true]), 3);
        assert_eq!(count_true(&[]), 0);
    }
}
