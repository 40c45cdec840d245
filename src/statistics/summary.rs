//! Summary statistics over a snapshot of sampled values
//!
//! Every function is total: an empty slice yields `0` (or `0.0`) rather than
//! an error or a sentinel, since exporters read these without checking.

/// Smallest value, or `0` when empty.
pub fn min(values: &[i64]) -> i64 {
    values.iter().copied().min().unwrap_or(0)
}

/// Largest value, or `0` when empty.
pub fn max(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(0)
}

/// Sum of all values. Wraps on overflow.
pub fn sum(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, &v| acc.wrapping_add(v))
}

/// Arithmetic mean, or `0.0` when empty.
pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    // i128 so the mean of large values does not wrap like `sum` does
    let total: i128 = values.iter().map(|&v| i128::from(v)).sum();
    total as f64 / values.len() as f64
}

/// Population variance (divides by `n`), or `0.0` when empty.
pub fn variance(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let squares: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - m;
            d * d
        })
        .sum();
    squares / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[i64]) -> f64 {
    variance(values).sqrt()
}

/// Single quantile, see [`percentiles`].
pub fn percentile(values: &mut [i64], p: f64) -> f64 {
    percentiles(values, &[p])[0]
}

/// Interpolated quantiles of `values`, one per entry of `ps`.
///
/// Sorts `values` in place. For a quantile `p` over `n` values the position
/// is `p * (n + 1)`; positions below 1 (or NaN) clamp to the minimum,
/// positions at or beyond `n` clamp to the maximum, anything else interpolates linearly
/// between the two neighbouring order statistics.
///
/// ```
/// use flowmetrics::statistics::percentiles;
///
/// let mut values = vec![5, 1, 4, 2, 3];
/// let ps = percentiles(&mut values, &[0.0, 0.5, 0.75, 1.0]);
/// assert_eq!(ps, vec![1.0, 3.0, 4.5, 5.0]);
/// ```
pub fn percentiles(values: &mut [i64], ps: &[f64]) -> Vec<f64> {
    let mut scores = vec![0.0; ps.len()];
    let size = values.len();
    if size == 0 {
        return scores;
    }

    values.sort_unstable();
    for (score, &p) in scores.iter_mut().zip(ps) {
        let pos = p * (size + 1) as f64;
        // NaN positions clamp to the minimum as well
        *score = if pos.is_nan() || pos < 1.0 {
            values[0] as f64
        } else if pos >= size as f64 {
            values[size - 1] as f64
        } else {
            let index = pos.floor();
            let lower = values[index as usize - 1] as f64;
            let upper = values[index as usize] as f64;
            lower + (pos - index) * (upper - lower)
        };
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty() {
        let mut empty: Vec<i64> = Vec::new();
        assert_eq!(min(&empty), 0);
        assert_eq!(max(&empty), 0);
        assert_eq!(sum(&empty), 0);
        assert_eq!(mean(&empty), 0.0);
        assert_eq!(variance(&empty), 0.0);
        assert_eq!(std_dev(&empty), 0.0);
        assert_eq!(percentile(&mut empty, 0.5), 0.0);
        assert_eq!(percentiles(&mut empty, &[0.1, 0.9]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_basic() {
        let values = [2, 4, 4, 4, 5, 5, 7, 9];

        assert_eq!(min(&values), 2);
        assert_eq!(max(&values), 9);
        assert_eq!(sum(&values), 40);
        assert_eq!(mean(&values), 5.0);
        assert_eq!(variance(&values), 4.0);
        assert_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn test_negative_values() {
        let values = [-10, -3, 0, 7];
        assert_eq!(min(&values), -10);
        assert_eq!(max(&values), 7);
        assert_eq!(sum(&values), -6);
        assert_eq!(mean(&values), -1.5);
    }

    #[test]
    fn test_mean_does_not_overflow() {
        let values = [i64::MAX, i64::MAX];
        assert_eq!(mean(&values), i64::MAX as f64);
    }

    #[test]
    fn test_percentile_interpolation() {
        // 1..=100: pos = p * 101
        let mut values: Vec<i64> = (1..=100).rev().collect();

        let ps = percentiles(&mut values, &[0.5, 0.75, 0.99, 0.999]);
        assert!((ps[0] - 50.5).abs() < 1e-9);
        assert!((ps[1] - 75.75).abs() < 1e-9);
        assert!((ps[2] - 99.99).abs() < 1e-9);
        // 0.999 * 101 >= 100
        assert_eq!(ps[3], 100.0);

        // pos < 1 clamps to the minimum
        assert_eq!(percentile(&mut values, 0.005), 1.0);
    }

    #[test]
    fn test_percentile_non_finite_quantile() {
        let mut values = vec![3, 1, 2];
        assert_eq!(
            percentiles(&mut values, &[f64::NAN, f64::NEG_INFINITY, f64::INFINITY]),
            vec![1.0, 1.0, 3.0]
        );
    }

    #[test]
    fn test_percentile_single_value() {
        let mut values = vec![42];
        assert_eq!(percentiles(&mut values, &[0.0, 0.5, 1.0]), vec![42.0; 3]);
    }

    proptest! {
        #[test]
        fn proptest_percentile_bounds_and_monotonicity(
            mut values in prop::collection::vec(-1_000_000i64..1_000_000, 1..200),
            mut ps in prop::collection::vec(0.0f64..=1.0, 1..20),
        ) {
            let lo = min(&values) as f64;
            let hi = max(&values) as f64;

            prop_assert_eq!(percentile(&mut values, 1.0), hi);
            prop_assert_eq!(percentile(&mut values, 0.0), lo);

            ps.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let scores = percentiles(&mut values, &ps);
            for pair in scores.windows(2) {
                prop_assert!(pair[0] <= pair[1] + 1e-9);
            }
            for s in scores {
                prop_assert!(s >= lo && s <= hi);
            }
        }
    }
}
