//! Analysis result types.

use serde::{Deserialize, Serialize};

use crate::analysis::covered_len;
use crate::config::{CiLevel, PercentileMethod};
use crate::types::{CiBounds, DirectionalEvents, EventWindow, SignificanceMask};

/// Complete result of an event detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Per-time-point confidence bounds.
    pub bounds: CiBounds,

    /// Time points whose interval excludes the reference.
    pub mask: SignificanceMask,

    /// Significant windows of at least `num_consec` points, ordered by start.
    pub events: Vec<EventWindow>,

    /// The same filter applied separately above and below the reference.
    pub directional: DirectionalEvents,

    /// Parameters and bookkeeping for replay.
    pub metadata: Metadata,
}

impl Analysis {
    /// Whether any window survived the run-length filter.
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Time points covered by event windows.
    pub fn covered_len(&self) -> usize {
        covered_len(&self.events)
    }
}

/// Run parameters, recorded so a result can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of subjects (M).
    pub n_subjects: usize,
    /// Number of time points (T).
    pub n_timepoints: usize,
    /// Bootstrap replicates drawn.
    pub n_boots: usize,
    /// Base seed actually used (drawn fresh when none was configured).
    pub seed: u64,
    /// Percentile pair.
    pub ci_level: CiLevel,
    /// Percentile rule.
    pub percentile_method: PercentileMethod,
    /// Whether intervals were widened for narrowness bias.
    pub narrowness_correction: bool,
    /// Minimum run length.
    pub num_consec: usize,
    /// Label of the per-replicate statistic.
    pub statistic: String,
    /// Wall-clock time for the whole run.
    pub runtime_secs: f64,
}
