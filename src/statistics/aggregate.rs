//! Per-replicate summary statistics.
//!
//! An [`Aggregator`] turns one replicate set into one value per time point.
//! The resampler and the CI estimator only see this trait, so a different
//! statistic (median, trimmed mean, a difference of group means) drops in
//! without touching either of them.

use crate::statistics::quantile::{percentile_sorted, sort_ascending};
use crate::types::InputMatrix;

/// Strategy computing the replicate vector from a resampled subject set.
pub trait Aggregator: Send + Sync {
    /// Write the statistic for every time point of `data` into `out`.
    ///
    /// `replicate` holds subject indices (with repeats); `out` has
    /// `data.n_timepoints()` slots.
    fn aggregate_into(&self, data: &InputMatrix, replicate: &[usize], out: &mut [f64]);

    /// Short label recorded in result metadata.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Arithmetic mean across the selected subjects (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Aggregator for Mean {
    fn aggregate_into(&self, data: &InputMatrix, replicate: &[usize], out: &mut [f64]) {
        debug_assert_eq!(out.len(), data.n_timepoints());
        let n = replicate.len() as f64;

        for (t, slot) in out.iter_mut().enumerate() {
            let column = data.timepoint(t);
            let sum: f64 = replicate.iter().map(|&s| column[s]).sum();
            *slot = sum / n;
        }
    }

    fn name(&self) -> &str {
        "mean"
    }
}

/// Median across the selected subjects. NaN if any selected value is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl Aggregator for Median {
    fn aggregate_into(&self, data: &InputMatrix, replicate: &[usize], out: &mut [f64]) {
        debug_assert_eq!(out.len(), data.n_timepoints());
        let mut scratch = Vec::with_capacity(replicate.len());

        for (t, slot) in out.iter_mut().enumerate() {
            let column = data.timepoint(t);
            scratch.clear();
            scratch.extend(replicate.iter().map(|&s| column[s]));
            if scratch.iter().any(|v| v.is_nan()) {
                *slot = f64::NAN;
                continue;
            }
            sort_ascending(&mut scratch);
            *slot = percentile_sorted(&scratch, 50.0);
        }
    }

    fn name(&self) -> &str {
        "median"
    }
}

/// Any `Fn(&[f64]) -> f64` is an aggregator: it receives the selected
/// subjects' values at one time point.
impl<F> Aggregator for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn aggregate_into(&self, data: &InputMatrix, replicate: &[usize], out: &mut [f64]) {
        let mut scratch = Vec::with_capacity(replicate.len());

        for (t, slot) in out.iter_mut().enumerate() {
            let column = data.timepoint(t);
            scratch.clear();
            scratch.extend(replicate.iter().map(|&s| column[s]));
            *slot = self(&scratch);
        }
    }
}
