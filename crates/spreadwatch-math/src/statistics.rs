//! Descriptive statistics over `f64` samples.
//!
//! Mean and standard deviation come from `statrs`; the standard deviation is
//! the sample (n − 1) estimate. Percentiles interpolate linearly between the
//! closest ranks, `rank = p / 100 × (n − 1)` over the sorted sample.
//!
//! Every function returns `None` when the statistic is undefined for the
//! input (empty sample, one point for the standard deviation) instead of a
//! NaN.

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Sample standard deviation (n − 1), `None` for fewer than two points.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// Sorts a copy of the sample in ascending order.
///
/// NaNs are not expected; callers filter non-finite values first.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linearly interpolated percentile of an already sorted sample.
///
/// `p` is in percent and clamped to `[0, 100]`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Linearly interpolated percentile of an unsorted sample.
///
/// ```rust
/// use spreadwatch_math::statistics::percentile;
///
/// let p = percentile(&[40.0, 10.0, 30.0, 20.0], 25.0).unwrap();
/// assert!((p - 17.5).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    percentile_sorted(&sorted(values), p)
}

/// Share of the sample strictly below `value`, in percent (0 to 100).
pub fn percentile_rank(value: f64, values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let below = values.iter().filter(|&&v| v < value).count();
    Some(below as f64 / values.len() as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_sample_std() {
        let values = [20.0, 30.0, 10.0];
        assert_relative_eq!(mean(&values).unwrap(), 20.0);
        assert_relative_eq!(sample_std_dev(&values).unwrap(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[4.2]), None);
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile_rank(1.0, &[]), None);
    }

    #[test]
    fn test_percentile_interpolation() {
        let values = [10.0, 20.0, 30.0];
        assert_relative_eq!(percentile(&values, 0.0).unwrap(), 10.0);
        assert_relative_eq!(percentile(&values, 10.0).unwrap(), 12.0);
        assert_relative_eq!(percentile(&values, 50.0).unwrap(), 20.0);
        assert_relative_eq!(percentile(&values, 75.0).unwrap(), 25.0);
        assert_relative_eq!(percentile(&values, 100.0).unwrap(), 30.0);
    }

    #[test]
    fn test_percentile_single_point() {
        assert_relative_eq!(percentile(&[7.0], 90.0).unwrap(), 7.0);
    }

    #[test]
    fn test_percentile_rank_strictly_below() {
        let values = [10.0, 20.0, 20.0, 30.0];
        assert_relative_eq!(percentile_rank(20.0, &values).unwrap(), 25.0);
        assert_relative_eq!(percentile_rank(5.0, &values).unwrap(), 0.0);
        assert_relative_eq!(percentile_rank(31.0, &values).unwrap(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_percentile_within_sample_bounds(
            values in prop::collection::vec(-500.0f64..500.0, 1..60),
            p in 0.0f64..=100.0,
        ) {
            let sorted = sorted(&values);
            let q = percentile_sorted(&sorted, p).unwrap();
            prop_assert!(q >= sorted[0] - 1e-9);
            prop_assert!(q <= sorted[sorted.len() - 1] + 1e-9);
        }

        #[test]
        fn prop_percentiles_are_monotone(
            values in prop::collection::vec(-500.0f64..500.0, 2..60),
        ) {
            let sorted = sorted(&values);
            let p10 = percentile_sorted(&sorted, 10.0).unwrap();
            let p25 = percentile_sorted(&sorted, 25.0).unwrap();
            let p75 = percentile_sorted(&sorted, 75.0).unwrap();
            let p90 = percentile_sorted(&sorted, 90.0).unwrap();
            prop_assert!(p10 <= p25 && p25 <= p75 && p75 <= p90);
        }
    }
}
