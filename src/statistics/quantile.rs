//! Percentiles of sorted bootstrap replicates.
//!
//! Two rules are supported: linear interpolation between order statistics
//! (the "R-7" definition, NumPy's default) and plain order-statistic
//! indexing without interpolation.

/// Sort ascending with `f64::total_cmp` (positive NaN last, negative NaN first).
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_unstable_by(|a, b| a.total_cmp(b));
}

/// Percentile `p` (in percent, 0–100) of ascending `sorted` data.
///
/// Uses rank `p / 100 * (n - 1)` and interpolates linearly between the
/// order statistics at `floor(rank)` and `ceil(rank)`.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute percentile of empty slice");
    assert!(
        (0.0..=100.0).contains(&p),
        "Percentile must be in [0, 100]"
    );

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * (p / 100.0);
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        sorted[n - 1]
    } else if h_frac == 0.0 {
        sorted[h_floor]
    } else {
        sorted[h_floor] + h_frac * (sorted[h_floor + 1] - sorted[h_floor])
    }
}

/// Lower and upper bounds by order-statistic indexing, no interpolation.
///
/// The lower bound is `sorted[ceil(n * lower / 100)]` and the upper bound is
/// `sorted[floor(n * upper / 100) - 1]`, both clamped into range. On very
/// few replicates the two indices can cross; the pair is returned ordered.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn order_statistic_bounds(sorted: &[f64], lower: f64, upper: f64) -> (f64, f64) {
    assert!(!sorted.is_empty(), "Cannot compute percentile of empty slice");

    let n = sorted.len();
    let last = n - 1;
    let lower_idx = ((n as f64 * lower / 100.0).ceil() as usize).min(last);
    let upper_idx = ((n as f64 * upper / 100.0).floor() as usize)
        .saturating_sub(1)
        .min(last);

    ordered(sorted[lower_idx], sorted[upper_idx])
}

/// Return `(a, b)` as `(min, max)`. NaN pairs come back unchanged.
#[inline]
pub fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_of_odd_count() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile_sorted(&data, 50.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_extremes() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&data, 0.0), 1.0);
        assert_eq!(percentile_sorted(&data, 100.0), 5.0);
    }

    #[test]
    fn test_linear_interpolation_matches_numpy() {
        // numpy.percentile(np.arange(1, 11), [2.5, 97.5]) == [1.225, 9.775]
        let data: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert!((percentile_sorted(&data, 2.5) - 1.225).abs() < 1e-12);
        assert!((percentile_sorted(&data, 97.5) - 9.775).abs() < 1e-12);
    }

    #[test]
    fn test_integral_rank_needs_no_interpolation() {
        // rank = 0.25 * 4 = 1
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile_sorted(&data, 25.0), 20.0);
    }

    #[test]
    fn test_constant_data_is_exact() {
        let data = [5.0; 100];
        assert_eq!(percentile_sorted(&data, 2.5), 5.0);
        assert_eq!(percentile_sorted(&data, 97.5), 5.0);
    }

    #[test]
    fn test_order_statistic_indices() {
        // n = 1000: lower index ceil(25) = 25, upper index floor(975) - 1 = 974
        let data: Vec<f64> = (0..1000).map(|x| x as f64).collect();
        assert_eq!(order_statistic_bounds(&data, 2.5, 97.5), (25.0, 974.0));
    }

    #[test]
    fn test_order_statistic_tiny_sample_stays_ordered() {
        let data = [1.0, 2.0];
        let (lo, hi) = order_statistic_bounds(&data, 2.5, 97.5);
        assert!(lo <= hi);
    }

    #[test]
    fn test_sort_puts_nan_last() {
        let mut data = [3.0, f64::NAN, 1.0];
        sort_ascending(&mut data);
        assert_eq!(data[0], 1.0);
        assert_eq!(data[1], 3.0);
        assert!(data[2].is_nan());
    }

    #[test]
    #[should_panic(expected = "Cannot compute percentile of empty slice")]
    fn test_empty_slice_panics() {
        percentile_sorted(&[], 50.0);
    }
}
