//! Percentile bootstrap confidence intervals per time point.
//!
//! Resample subjects `n_boots` times, aggregate each replicate, then read
//! the requested percentiles off every column of the resulting distribution.
//! Zero-variance columns (e.g. a single subject) give zero-width intervals,
//! never an error.

use std::time::Instant;

use crate::cancel::CancelToken;
use crate::config::{CiLevel, PercentileMethod};
use crate::error::Result;
use crate::statistics::{bootstrap_distribution, Aggregator};
use crate::types::{CiBounds, InputMatrix};

/// Input data for a CI estimation run.
pub struct CiInput<'a, A: ?Sized> {
    /// Subjects × time points data.
    pub data: &'a InputMatrix,
    /// Number of bootstrap replicates (at least 2).
    pub n_boots: usize,
    /// Percentile pair.
    pub ci_level: CiLevel,
    /// Percentile rule.
    pub method: PercentileMethod,
    /// Widen intervals by `sqrt(M / (M - 1))`.
    pub narrowness_correction: bool,
    /// Base seed; replicate `i` uses a stream derived from it.
    pub seed: u64,
    /// Statistic computed per replicate.
    pub aggregator: &'a A,
    /// Optional cancellation flag, polled between replicates.
    pub cancel: Option<&'a CancelToken>,
}

/// Run the CI estimator.
///
/// # Errors
///
/// [`Error::InvalidInput`](crate::Error::InvalidInput) for `n_boots < 2` or a
/// bad percentile pair; [`Error::Cancelled`](crate::Error::Cancelled) if the
/// token trips.
pub fn run_ci_estimator<A: Aggregator + ?Sized>(input: &CiInput<'_, A>) -> Result<CiBounds> {
    input.ci_level.validate()?;

    tracing::debug!(
        n_boots = input.n_boots,
        n_subjects = input.data.n_subjects(),
        n_timepoints = input.data.n_timepoints(),
        seed = input.seed,
        statistic = input.aggregator.name(),
        parallel = cfg!(feature = "parallel"),
        "starting bootstrap"
    );
    let start = Instant::now();
    let distribution = bootstrap_distribution(
        input.data,
        input.n_boots,
        input.seed,
        input.aggregator,
        input.cancel,
    )?;
    warn_if_extreme(input.n_boots, input.ci_level);
    let mut bounds = distribution.bounds(input.ci_level, input.method)?;

    if input.narrowness_correction {
        apply_narrowness_correction(&mut bounds, input.data.n_subjects());
    }

    tracing::debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "bootstrap finished"
    );
    Ok(bounds)
}

/// Widen every interval by `sqrt(n / (n - 1))` around its midpoint.
///
/// The percentile bootstrap is biased narrow by that factor for `n`
/// subjects. The extra width is split equally between the two sides.
/// Undefined for a single subject, where the bounds are left unchanged.
pub fn apply_narrowness_correction(bounds: &mut CiBounds, n_subjects: usize) {
    if n_subjects < 2 {
        tracing::debug!(n_subjects, "narrowness correction skipped");
        return;
    }

    let factor = (n_subjects as f64 / (n_subjects - 1) as f64).sqrt();
    tracing::debug!(factor, "applying narrowness correction");

    let (lower, upper) = bounds.bounds_mut();
    for (lo, hi) in lower.iter_mut().zip(upper.iter_mut()) {
        let width = *hi - *lo;
        let change = factor * width - width;
        *lo -= change / 2.0;
        *hi += change / 2.0;
    }
}

/// Both percentile ranks falling on the extreme order statistics means the
/// interval is just the replicate range.
fn warn_if_extreme(n_boots: usize, level: CiLevel) {
    let last = (n_boots - 1) as f64;
    if (level.lower / 100.0 * last) < 1.0 && (level.upper / 100.0 * last) > last - 1.0 {
        tracing::warn!(
            n_boots,
            lower = level.lower,
            upper = level.upper,
            "too few replicates to resolve the requested percentiles"
        );
    }
}
