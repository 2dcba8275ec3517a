//! # bootci
//!
//! Detect time windows where a group-level signal departs from a reference,
//! using percentile bootstrap confidence intervals.
//!
//! The input is a subjects × time points matrix. Subjects are resampled with
//! replacement, the per-time-point statistic (mean by default) is computed on
//! each replicate, and the requested percentiles of the replicate
//! distribution form the interval at each time point. A time point is
//! significant when the reference lies strictly outside its interval, and
//! only runs of at least `num_consec` significant points count as events.
//!
//! ## Quick Start
//!
//! ```
//! use bootci::{compute_ci, detect_significant_events, CiLevel, InputMatrix, Reference};
//!
//! let data = InputMatrix::from_rows(&[
//!     [0.1, 2.0, 2.2, 1.9, 0.0],
//!     [-0.1, 2.1, 1.8, 2.0, 0.1],
//!     [0.0, 1.9, 2.0, 2.1, -0.1],
//! ])?;
//!
//! let bounds = compute_ci(&data, 500, CiLevel::default(), Some(42))?;
//! let events = detect_significant_events(&bounds, &Reference::Scalar(0.0), 2)?;
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!((events[0].start, events[0].end), (1, 3));
//! # Ok::<(), bootci::Error>(())
//! ```
//!
//! For the whole pipeline with metadata, directional events and reporting,
//! use [`EventDetector`].
//!
//! ## Features
//!
//! - `parallel` (default): replicates are computed on a shared rayon pool.
//!   Results are bit-identical to the sequential path for the same seed.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod cancel;
mod config;
mod constants;
mod detector;
mod error;
mod result;
mod thread_pool;
mod types;

// Functional modules
pub mod analysis;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use cancel::CancelToken;
pub use config::{CiLevel, Config, PercentileMethod};
pub use constants::{DEFAULT_LOWER_PERCENTILE, DEFAULT_N_BOOTS, DEFAULT_UPPER_PERCENTILE};
pub use detector::EventDetector;
pub use error::{Error, Result};
pub use result::{Analysis, Metadata};
pub use statistics::{Aggregator, BootDistribution, Mean, Median};
pub use types::{
    CiBounds, DirectionalEvents, EventWindow, InputMatrix, Reference, SignificanceMask,
};

use analysis::{directional_masks, find_runs, run_ci_estimator, significance_mask, CiInput};
use statistics::resolve_seed;

/// Percentile bootstrap confidence bounds of the mean at every time point.
///
/// Uses linear interpolation between order statistics and no narrowness
/// correction. With `seed = Some(s)` the result is fully deterministic,
/// regardless of whether the `parallel` feature is enabled.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `n_boots < 2` or the percentile pair is not
/// `0 < lower < upper < 100`.
pub fn compute_ci(
    matrix: &InputMatrix,
    n_boots: usize,
    ci_level: CiLevel,
    seed: Option<u64>,
) -> Result<CiBounds> {
    Config {
        n_boots,
        ci_level,
        seed,
        ..Config::default()
    }
    .validate()?;

    run_ci_estimator(&CiInput {
        data: matrix,
        n_boots,
        ci_level,
        method: PercentileMethod::Linear,
        narrowness_correction: false,
        seed: resolve_seed(seed),
        aggregator: &Mean,
        cancel: None,
    })
}

/// Windows of at least `num_consec` consecutive time points whose interval
/// excludes the reference, ordered by start.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `num_consec < 1` or a per-time-point reference
/// does not match the number of time points.
pub fn detect_significant_events(
    ci_bounds: &CiBounds,
    reference: &Reference,
    num_consec: usize,
) -> Result<Vec<EventWindow>> {
    check_num_consec(num_consec)?;
    let mask = significance_mask(ci_bounds, reference)?;
    find_runs(&mask, num_consec)
}

/// Like [`detect_significant_events`], but with runs above and below the
/// reference filtered separately.
///
/// A run that crosses from above to below the reference without a gap is
/// one event for [`detect_significant_events`] but two shorter runs here.
///
/// # Errors
///
/// Same as [`detect_significant_events`].
pub fn detect_directional_events(
    ci_bounds: &CiBounds,
    reference: &Reference,
    num_consec: usize,
) -> Result<DirectionalEvents> {
    check_num_consec(num_consec)?;
    let (positive, negative) = directional_masks(ci_bounds, reference)?;
    Ok(DirectionalEvents {
        positive: find_runs(&positive, num_consec)?,
        negative: find_runs(&negative, num_consec)?,
    })
}

fn check_num_consec(num_consec: usize) -> Result<()> {
    if num_consec < 1 {
        return Err(Error::invalid("num_consec must be at least 1, got 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> CiBounds {
        // significant: F T T T F T, with t=3 below the reference
        CiBounds::new(
            vec![-1.0, 0.5, 0.5, -2.0, -1.0, 0.5],
            vec![1.0, 2.0, 2.0, -0.5, 1.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_detect_significant_events() {
        let reference = Reference::Scalar(0.0);
        assert_eq!(
            detect_significant_events(&bounds(), &reference, 1).unwrap(),
            vec![EventWindow::new(1, 3), EventWindow::new(5, 5)]
        );
        assert_eq!(
            detect_significant_events(&bounds(), &reference, 3).unwrap(),
            vec![EventWindow::new(1, 3)]
        );
        assert!(detect_significant_events(&bounds(), &reference, 4)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_detect_directional_events() {
        let events = detect_directional_events(&bounds(), &Reference::Scalar(0.0), 2).unwrap();
        assert_eq!(events.positive, vec![EventWindow::new(1, 2)]);
        assert!(events.negative.is_empty());
    }

    #[test]
    fn test_num_consec_zero_rejected() {
        let err = detect_significant_events(&bounds(), &Reference::Scalar(0.0), 0).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(detect_directional_events(&bounds(), &Reference::Scalar(0.0), 0)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_compute_ci_rejects_single_replicate() {
        let data = InputMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = compute_ci(&data, 1, CiLevel::default(), Some(0)).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
