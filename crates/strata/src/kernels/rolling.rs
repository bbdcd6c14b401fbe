//! Rolling reduction kernels over float slices.
//!
//! A window of `window` rows ends at each output position. Position `i` is
//! evaluated when a full window is available and `(i + 1 - window)` is a
//! multiple of `step`; all other positions are NaN. `step == 1` gives the
//! classic dense rolling reduction. Min and max use the monotonic-deque
//! algorithm, amortised O(1) per element.

// dependencies
use std::collections::VecDeque;
use crate::error::{Result, StrataError};

fn check_rolling_args(values: usize, window: usize, step: usize, out: usize) -> Result<()> {
    if window == 0 || step == 0 {
        return Err(StrataError::Kernel(format!(
            "rolling window {window} and step {step} must be positive"
        )));
    }
    if values != out {
        return Err(StrataError::Arity(format!(
            "rolling output length {out} does not match input length {values}"
        )));
    }
    Ok(())
}

fn emit_at(i: usize, window: usize, step: usize) -> bool {
    i + 1 >= window && (i + 1 - window) % step == 0
}

/// Rolling sum into `out` (same length as `values`).
pub fn rolling_sum(values: &[f64], window: usize, step: usize, out: &mut [f64]) -> Result<()> {
    check_rolling_args(values.len(), window, step, out.len())?;
    let mut acc = 0.0;
    for (i, &v) in values.iter().enumerate() {
        acc += v;
        if i >= window {
            acc -= values[i - window];
        }
        out[i] = if emit_at(i, window, step) { acc } else { f64::NAN };
    }
    Ok(())
}

// shared monotonic-deque walk; `keep` orders the deque front to the extreme
fn rolling_extreme(
    values: &[f64], window: usize, step: usize, out: &mut [f64],
    keep: impl Fn(f64, f64) -> bool,
) -> Result<()> {
    check_rolling_args(values.len(), window, step, out.len())?;
    let mut deque: VecDeque<usize> = VecDeque::new();
    for (i, &v) in values.iter().enumerate() {
        // evict indices that fell out of the window
        while deque.front().is_some_and(|&front| front + window <= i) {
            deque.pop_front();
        }
        // evict values dominated by the incoming one
        while deque.back().is_some_and(|&back| keep(v, values[back])) {
            deque.pop_back();
        }
        deque.push_back(i);
        out[i] = if emit_at(i, window, step) {
            deque.front().map_or(f64::NAN, |&front| values[front])
        } else {
            f64::NAN
        };
    }
    Ok(())
}

/// Rolling minimum into `out` via a monotonically increasing deque.
pub fn rolling_min(values: &[f64], window: usize, step: usize, out: &mut [f64]) -> Result<()> {
    rolling_extreme(values, window, step, out, |incoming, back| incoming <= back)
}

/// Rolling maximum into `out` via a monotonically decreasing deque.
pub fn rolling_max(values: &[f64], window: usize, step: usize, out: &mut [f64]) -> Result<()> {
    rolling_extreme(values, window, step, out, |incoming, back| incoming >= back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_sum_dense() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut out = [0.0; 5];
        rolling_sum(&values, 3, 1, &mut out).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(&out[2..], &[6.0, 9.0, 12.0]);
    }

    #[test]
    fn rolling_sum_with_step_skips_positions() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0; 6];
        rolling_sum(&values, 2, 2, &mut out).unwrap();
        // full windows end at 1, 3, 5
        assert_eq!(out[1], 3.0);
        assert!(out[2].is_nan());
        assert_eq!(out[3], 7.0);
        assert_eq!(out[5], 11.0);
    }

    #[test]
    fn rolling_min_max_match_naive_windows() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let window = 3;
        let mut min_out = [0.0; 8];
        let mut max_out = [0.0; 8];
        rolling_min(&values, window, 1, &mut min_out).unwrap();
        rolling_max(&values, window, 1, &mut max_out).unwrap();
        for i in (window - 1)..values.len() {
            let naive = &values[i + 1 - window..=i];
            let naive_min = naive.iter().cloned().fold(f64::INFINITY, f64::min);
            let naive_max = naive.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(min_out[i], naive_min, "min at {i}");
            assert_eq!(max_out[i], naive_max, "max at {i}");
        }
    }

    #[test]
    fn zero_window_is_a_kernel_error() {
        let mut out = [0.0; 1];
        assert!(rolling_sum(&[1.0], 0, 1, &mut out).is_err());
        assert!(rolling_min(&[1.0], 1, 0, &mut out).is_err());
    }

    #[test]
    fn window_of_one_reproduces_the_input() {
        let values = [2.0, 7.0, 1.0];
        let mut out = [0.0; 3];
        rolling_max(&values, 1, 1, &mut out).unwrap();
        assert_eq!(out, values);
    }
}
