//! Bootstrap distribution of the per-time-point statistic.
//!
//! Replicate `i` resamples subjects with its own RNG stream, aggregates them
//! into a length-T vector and writes it to column `i` of the buffer. Columns
//! are disjoint, so the parallel path hands each worker its own slices and
//! never shares an RNG.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::DMatrix;

use crate::cancel::CancelToken;
use crate::config::{CiLevel, PercentileMethod};
use crate::constants::MIN_N_BOOTS;
use crate::error::{Error, Result};
use crate::statistics::aggregate::Aggregator;
use crate::statistics::quantile::{order_statistic_bounds, ordered, percentile_sorted, sort_ascending};
use crate::statistics::resample::{replicate_rng, resample_subjects_into};
use crate::types::{CiBounds, InputMatrix};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bootstrap distribution: `n_boots` replicate vectors of length T.
///
/// Stored as a `T × n_boots` matrix with one replicate per column, so the
/// buffer filled by the workers becomes the matrix without a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct BootDistribution {
    values: DMatrix<f64>,
}

impl BootDistribution {
    /// Number of replicates.
    pub fn n_boots(&self) -> usize {
        self.values.ncols()
    }

    /// Number of time points.
    pub fn n_timepoints(&self) -> usize {
        self.values.nrows()
    }

    /// All replicate values at time point `t`, in replicate order.
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_timepoints()`.
    pub fn timepoint(&self, t: usize) -> Vec<f64> {
        self.values.row(t).iter().copied().collect()
    }

    /// Replicate vector `i` (one value per time point).
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_boots()`.
    pub fn replicate(&self, i: usize) -> &[f64] {
        let n = self.n_timepoints();
        &self.values.as_slice()[i * n..(i + 1) * n]
    }

    /// Borrow the underlying `T × n_boots` matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Percentile bounds per time point.
    ///
    /// Each time point's replicates are copied, sorted, and read off with
    /// `method`. A time point with any NaN replicate gets NaN for both
    /// bounds, whatever the NaN's sign.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `level` is not a valid percentile pair.
    pub fn bounds(&self, level: CiLevel, method: PercentileMethod) -> Result<CiBounds> {
        level.validate()?;

        let n_timepoints = self.n_timepoints();
        let mut lower = Vec::with_capacity(n_timepoints);
        let mut upper = Vec::with_capacity(n_timepoints);
        let mut sorted = Vec::with_capacity(self.n_boots());

        for t in 0..n_timepoints {
            sorted.clear();
            sorted.extend(self.values.row(t).iter().copied());
            if sorted.iter().any(|v| v.is_nan()) {
                lower.push(f64::NAN);
                upper.push(f64::NAN);
                continue;
            }
            sort_ascending(&mut sorted);

            let (lo, hi) = match method {
                PercentileMethod::Linear => ordered(
                    percentile_sorted(&sorted, level.lower),
                    percentile_sorted(&sorted, level.upper),
                ),
                PercentileMethod::OrderStatistic => {
                    order_statistic_bounds(&sorted, level.lower, level.upper)
                }
            };
            lower.push(lo);
            upper.push(hi);
        }

        CiBounds::new(lower, upper)
    }
}

/// Build the bootstrap distribution of `aggregator` over `data`.
///
/// Replicate `i` draws from the stream `replicate_rng(seed, i)`, so the
/// result is bit-identical for a given seed regardless of thread count.
/// `cancel` is polled before each replicate.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `n_boots < 2`; [`Error::Cancelled`] if the
/// token trips before all replicates are done.
pub fn bootstrap_distribution<A: Aggregator + ?Sized>(
    data: &InputMatrix,
    n_boots: usize,
    seed: u64,
    aggregator: &A,
    cancel: Option<&CancelToken>,
) -> Result<BootDistribution> {
    if n_boots < MIN_N_BOOTS {
        return Err(Error::invalid(format!(
            "n_boots must be at least {MIN_N_BOOTS}, got {n_boots}"
        )));
    }

    let n_subjects = data.n_subjects();
    let n_timepoints = data.n_timepoints();
    let total = n_boots.checked_mul(n_timepoints).ok_or_else(|| {
        Error::invalid(format!(
            "distribution of {n_boots} x {n_timepoints} values overflows"
        ))
    })?;
    let mut flat = vec![0.0_f64; total];
    let completed = AtomicUsize::new(0);
    let is_cancelled = || cancel.is_some_and(CancelToken::is_cancelled);

    #[cfg(feature = "parallel")]
    let outcome: std::result::Result<(), ()> = crate::thread_pool::install(|| {
        flat.par_chunks_mut(n_timepoints)
            .enumerate()
            .try_for_each_init(
                // Per-worker replicate buffer
                || vec![0usize; n_subjects],
                |replicate, (i, row)| {
                    if is_cancelled() {
                        return Err(());
                    }
                    let mut rng = replicate_rng(seed, i);
                    resample_subjects_into(&mut rng, n_subjects, &mut replicate[..]);
                    aggregator.aggregate_into(data, &replicate[..], row);
                    completed.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                },
            )
    });

    #[cfg(not(feature = "parallel"))]
    let outcome: std::result::Result<(), ()> = {
        let mut replicate = vec![0usize; n_subjects];
        flat.chunks_mut(n_timepoints)
            .enumerate()
            .try_for_each(|(i, row)| {
                if is_cancelled() {
                    return Err(());
                }
                let mut rng = replicate_rng(seed, i);
                resample_subjects_into(&mut rng, n_subjects, &mut replicate);
                aggregator.aggregate_into(data, &replicate, row);
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
    };

    if outcome.is_err() {
        let completed = completed.load(Ordering::Relaxed);
        tracing::debug!(completed, requested = n_boots, "bootstrap cancelled");
        return Err(Error::Cancelled {
            completed,
            requested: n_boots,
        });
    }

    Ok(BootDistribution {
        values: DMatrix::from_vec(n_timepoints, n_boots, flat),
    })
}
