//! Configuration for bootstrap event detection.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOWER_PERCENTILE, DEFAULT_N_BOOTS, DEFAULT_UPPER_PERCENTILE, MIN_N_BOOTS,
};
use crate::error::{Error, Result};
use crate::types::Reference;

/// Configuration options for [`EventDetector`](crate::EventDetector).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bootstrap replicates (default: 1,000). Must be at least 2.
    pub n_boots: usize,

    /// Percentile pair for the interval (default: 2.5 / 97.5).
    pub ci_level: CiLevel,

    /// Null value the interval is tested against (default: 0).
    pub reference: Reference,

    /// Optional base seed for deterministic replay.
    ///
    /// When `None`, a seed is drawn from the thread rng and reported in the
    /// result metadata so the run can still be replayed.
    pub seed: Option<u64>,

    /// How percentiles are read off the sorted replicates (default: `Linear`).
    pub percentile_method: PercentileMethod,

    /// Widen intervals by `sqrt(M / (M - 1))` to offset the bootstrap's
    /// narrowness bias on small subject counts (default: off).
    pub narrowness_correction: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_boots: DEFAULT_N_BOOTS,
            ci_level: CiLevel::default(),
            reference: Reference::default(),
            seed: None,
            percentile_method: PercentileMethod::Linear,
            narrowness_correction: false,
        }
    }
}

impl Config {
    /// Check every parameter, returning the first violation found.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `n_boots < 2` or the percentile pair is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.n_boots < MIN_N_BOOTS {
            return Err(Error::invalid(format!(
                "n_boots must be at least {}, got {}",
                MIN_N_BOOTS, self.n_boots
            )));
        }
        self.ci_level.validate()
    }
}

/// Lower and upper percentiles (in percent) bounding the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CiLevel {
    /// Lower percentile, in (0, 100).
    pub lower: f64,
    /// Upper percentile, in (0, 100) and above `lower`.
    pub upper: f64,
}

impl Default for CiLevel {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_PERCENTILE,
            upper: DEFAULT_UPPER_PERCENTILE,
        }
    }
}

impl CiLevel {
    /// Explicit percentile pair. Validated when the analysis runs.
    pub fn percentiles(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Symmetric interval for a confidence level in (0, 1), e.g. 0.95 → 2.5 / 97.5.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `confidence` is not strictly between 0 and 1.
    pub fn confidence(confidence: f64) -> Result<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(Error::invalid(format!(
                "confidence level must be in (0, 1), got {confidence}"
            )));
        }
        let tail = (1.0 - confidence) / 2.0 * 100.0;
        Ok(Self {
            lower: tail,
            upper: 100.0 - tail,
        })
    }

    /// Nominal coverage of the interval as a fraction.
    pub fn coverage(&self) -> f64 {
        (self.upper - self.lower) / 100.0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, p) in [("lower", self.lower), ("upper", self.upper)] {
            if !(p > 0.0 && p < 100.0) {
                return Err(Error::invalid(format!(
                    "{name} percentile must be in (0, 100), got {p}"
                )));
            }
        }
        if self.lower >= self.upper {
            return Err(Error::invalid(format!(
                "lower percentile {} must be below upper percentile {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Rule for turning sorted replicates into a percentile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentileMethod {
    /// Linear interpolation between order statistics at rank
    /// `p / 100 * (n - 1)` (the R-7 / NumPy default).
    #[default]
    Linear,

    /// No interpolation: lower bound at `sorted[ceil(n * p_lo / 100)]`,
    /// upper bound at `sorted[floor(n * p_hi / 100) - 1]`.
    OrderStatistic,
}
