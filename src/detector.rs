//! Main `EventDetector` entry point and builder.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{directional_masks, find_runs, run_ci_estimator, significance_mask, CiInput};
use crate::cancel::CancelToken;
use crate::config::{CiLevel, Config, PercentileMethod};
use crate::error::{Error, Result};
use crate::result::{Analysis, Metadata};
use crate::statistics::{bootstrap_distribution, resolve_seed, Aggregator, BootDistribution, Mean};
use crate::types::{CiBounds, DirectionalEvents, InputMatrix, Reference};

/// Bootstrap event detector.
///
/// Configure with the builder methods, then call [`run`](Self::run). Each
/// run is a pure pipeline: data → CI bounds → significance mask → windows.
/// The detector holds configuration only and can be reused or cloned.
///
/// # Example
///
/// ```
/// use bootci::{EventDetector, InputMatrix};
///
/// let data = InputMatrix::from_rows(&[
///     [0.0, 0.0, 5.0, 5.0, 0.0],
///     [0.0, 0.0, 5.0, 5.0, 0.0],
///     [0.0, 0.0, 5.0, 5.0, 0.0],
/// ])?;
///
/// let analysis = EventDetector::new()
///     .n_boots(100)
///     .seed(7)
///     .run(&data, 2)?;
///
/// assert_eq!(analysis.events.len(), 1);
/// assert_eq!((analysis.events[0].start, analysis.events[0].end), (2, 3));
/// # Ok::<(), bootci::Error>(())
/// ```
#[derive(Clone)]
pub struct EventDetector {
    config: Config,
    statistic: Arc<dyn Aggregator>,
    cancel: Option<CancelToken>,
}

impl fmt::Debug for EventDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDetector")
            .field("config", &self.config)
            .field("statistic", &self.statistic.name())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetector {
    /// Create with default configuration (1,000 replicates, 2.5 / 97.5, mean).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create with fast configuration for tests and interactive exploration.
    ///
    /// Settings:
    /// - 200 replicates (vs 1,000 default)
    pub fn quick() -> Self {
        Self::with_config(Config {
            n_boots: 200,
            ..Config::default()
        })
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            statistic: Arc::new(Mean),
            cancel: None,
        }
    }

    /// Merge configuration from `BOOTCI_*` environment variables.
    ///
    /// Recognized: `BOOTCI_N_BOOTS`, `BOOTCI_SEED`, `BOOTCI_LOWER_PERCENTILE`,
    /// `BOOTCI_UPPER_PERCENTILE`, `BOOTCI_REFERENCE`, `BOOTCI_METHOD`
    /// (`linear` or `order`), `BOOTCI_NARROWNESS` (`1` or `true`).
    /// Values that fail to parse are ignored.
    pub fn from_env(mut self) -> Self {
        if let Some(n) = parse_env::<usize>("BOOTCI_N_BOOTS") {
            self = self.n_boots(n);
        }
        if let Some(seed) = parse_env::<u64>("BOOTCI_SEED") {
            self = self.seed(seed);
        }
        if let Some(lower) = parse_env::<f64>("BOOTCI_LOWER_PERCENTILE") {
            self.config.ci_level.lower = lower;
        }
        if let Some(upper) = parse_env::<f64>("BOOTCI_UPPER_PERCENTILE") {
            self.config.ci_level.upper = upper;
        }
        if let Some(reference) = parse_env::<f64>("BOOTCI_REFERENCE") {
            self = self.reference(reference);
        }
        if let Some(method) = parse_method_env("BOOTCI_METHOD") {
            self = self.percentile_method(method);
        }
        if let Ok(val) = env::var("BOOTCI_NARROWNESS") {
            if val == "1" || val.eq_ignore_ascii_case("true") {
                self = self.narrowness_correction(true);
            }
        }
        self
    }

    /// Set the number of bootstrap replicates.
    pub fn n_boots(mut self, n: usize) -> Self {
        self.config.n_boots = n;
        self
    }

    /// Set the percentile pair.
    pub fn ci_level(mut self, level: CiLevel) -> Self {
        self.config.ci_level = level;
        self
    }

    /// Set the percentile pair from its two percentiles (in percent).
    pub fn percentiles(self, lower: f64, upper: f64) -> Self {
        self.ci_level(CiLevel::percentiles(lower, upper))
    }

    /// Set the null reference (scalar or one value per time point).
    pub fn reference(mut self, reference: impl Into<Reference>) -> Self {
        self.config.reference = reference.into();
        self
    }

    /// Set a deterministic base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the percentile rule.
    pub fn percentile_method(mut self, method: PercentileMethod) -> Self {
        self.config.percentile_method = method;
        self
    }

    /// Enable or disable the `sqrt(M / (M - 1))` widening.
    pub fn narrowness_correction(mut self, enabled: bool) -> Self {
        self.config.narrowness_correction = enabled;
        self
    }

    /// Replace the per-replicate statistic (default: [`Mean`]).
    pub fn statistic<A: Aggregator + 'static>(mut self, statistic: A) -> Self {
        self.statistic = Arc::new(statistic);
        self
    }

    /// Attach a cancellation token polled between replicates.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bootstrap distribution of the configured statistic (replicates × T).
    ///
    /// Only replayable when a [`seed`](Self::seed) is configured; otherwise
    /// the drawn seed is logged at debug level and not returned. Use
    /// [`run`](Self::run) to get it in [`Metadata`].
    ///
    /// # Errors
    ///
    /// See [`bootstrap_distribution`].
    pub fn distribution(&self, data: &InputMatrix) -> Result<BootDistribution> {
        self.config.validate()?;
        bootstrap_distribution(
            data,
            self.config.n_boots,
            self.seed_for_call(),
            self.statistic.as_ref(),
            self.cancel.as_ref(),
        )
    }

    /// Confidence bounds only.
    ///
    /// Replay needs a configured [`seed`](Self::seed), as with
    /// [`distribution`](Self::distribution).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] on invalid configuration, [`Error::Cancelled`]
    /// if the token trips.
    pub fn compute_ci(&self, data: &InputMatrix) -> Result<CiBounds> {
        self.config.validate()?;
        self.estimate(data, self.seed_for_call())
    }

    /// Run the full pipeline and keep windows of at least `num_consec` points.
    ///
    /// All parameters are validated before any resampling starts.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] on invalid configuration, `num_consec < 1`, or
    /// a per-time-point reference of the wrong length; [`Error::Cancelled`]
    /// if the token trips.
    pub fn run(&self, data: &InputMatrix, num_consec: usize) -> Result<Analysis> {
        self.config.validate()?;
        self.config.reference.check_len(data.n_timepoints())?;
        if num_consec < 1 {
            return Err(Error::invalid("num_consec must be at least 1, got 0"));
        }

        let start = Instant::now();
        let seed = self.seed_for_call();

        let bounds = self.estimate(data, seed)?;
        let reference = &self.config.reference;

        let mask = significance_mask(&bounds, reference)?;
        let events = find_runs(&mask, num_consec)?;

        let (positive, negative) = directional_masks(&bounds, reference)?;
        let directional = DirectionalEvents {
            positive: find_runs(&positive, num_consec)?,
            negative: find_runs(&negative, num_consec)?,
        };

        tracing::debug!(
            significant = mask.count_significant(),
            windows = events.len(),
            num_consec,
            "event detection finished"
        );

        let metadata = Metadata {
            n_subjects: data.n_subjects(),
            n_timepoints: data.n_timepoints(),
            n_boots: self.config.n_boots,
            seed,
            ci_level: self.config.ci_level,
            percentile_method: self.config.percentile_method,
            narrowness_correction: self.config.narrowness_correction,
            num_consec,
            statistic: self.statistic.name().to_string(),
            runtime_secs: start.elapsed().as_secs_f64(),
        };

        Ok(Analysis {
            bounds,
            mask,
            events,
            directional,
            metadata,
        })
    }

    fn seed_for_call(&self) -> u64 {
        let seed = resolve_seed(self.config.seed);
        if self.config.seed.is_none() {
            tracing::debug!(seed, "drew bootstrap seed");
        }
        seed
    }

    fn estimate(&self, data: &InputMatrix, seed: u64) -> Result<CiBounds> {
        run_ci_estimator(&CiInput {
            data,
            n_boots: self.config.n_boots,
            ci_level: self.config.ci_level,
            method: self.config.percentile_method,
            narrowness_correction: self.config.narrowness_correction,
            seed,
            aggregator: self.statistic.as_ref(),
            cancel: self.cancel.as_ref(),
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(key, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}

fn parse_method_env(key: &str) -> Option<PercentileMethod> {
    match env::var(key).ok()?.to_ascii_lowercase().as_str() {
        "linear" => Some(PercentileMethod::Linear),
        "order" | "order_statistic" => Some(PercentileMethod::OrderStatistic),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::Median;

    fn step_data() -> InputMatrix {
        InputMatrix::from_rows(&[
            vec![0.0, 0.0, 5.0, 5.0, 0.0],
            vec![0.0, 0.0, 5.0, 5.0, 0.0],
            vec![0.0, 0.0, 5.0, 5.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_builder_sets_config() {
        let detector = EventDetector::new()
            .n_boots(321)
            .percentiles(5.0, 95.0)
            .reference(1.5)
            .seed(9)
            .percentile_method(PercentileMethod::OrderStatistic)
            .narrowness_correction(true);

        let config = detector.config();
        assert_eq!(config.n_boots, 321);
        assert_eq!(config.ci_level, CiLevel::percentiles(5.0, 95.0));
        assert_eq!(config.reference, Reference::Scalar(1.5));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.percentile_method, PercentileMethod::OrderStatistic);
        assert!(config.narrowness_correction);
    }

    #[test]
    fn test_quick_preset() {
        assert_eq!(EventDetector::quick().config().n_boots, 200);
    }

    #[test]
    fn test_step_scenario() {
        let detector = EventDetector::new().n_boots(100).seed(1);
        let analysis = detector.run(&step_data(), 2).unwrap();
        assert_eq!(&*analysis.mask, &[false, false, true, true, false]);
        assert_eq!(analysis.events, vec![crate::EventWindow::new(2, 3)]);
        assert_eq!(analysis.directional.positive, analysis.events);
        assert!(analysis.directional.negative.is_empty());

        let strict = detector.run(&step_data(), 3).unwrap();
        assert!(strict.events.is_empty());
    }

    #[test]
    fn test_metadata_records_run() {
        let analysis = EventDetector::quick()
            .seed(77)
            .statistic(Median)
            .run(&step_data(), 1)
            .unwrap();
        let meta = &analysis.metadata;
        assert_eq!(meta.n_subjects, 3);
        assert_eq!(meta.n_timepoints, 5);
        assert_eq!(meta.n_boots, 200);
        assert_eq!(meta.seed, 77);
        assert_eq!(meta.num_consec, 1);
        assert_eq!(meta.statistic, "median");
    }

    #[test]
    fn test_validates_before_resampling() {
        let data = step_data();
        let token = CancelToken::new();
        token.cancel();
        let detector = EventDetector::quick().cancel_token(token);

        // num_consec is rejected before the cancelled bootstrap could run.
        assert!(detector.run(&data, 0).unwrap_err().is_invalid_input());
        assert!(detector
            .clone()
            .reference(vec![0.0; 4])
            .run(&data, 1)
            .unwrap_err()
            .is_invalid_input());
        assert!(EventDetector::new()
            .n_boots(1)
            .run(&data, 1)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_cancelled_run() {
        let token = CancelToken::new();
        token.cancel();
        let err = EventDetector::quick()
            .cancel_token(token)
            .run(&step_data(), 1)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { requested: 200, .. }));
    }

    #[test]
    fn test_unseeded_runs_record_their_seed() {
        let data = step_data();
        let first = EventDetector::quick().run(&data, 1).unwrap();
        let replay = EventDetector::quick()
            .seed(first.metadata.seed)
            .run(&data, 1)
            .unwrap();
        assert_eq!(first.bounds, replay.bounds);
    }

    #[test]
    fn test_distribution_shape() {
        let dist = EventDetector::quick().seed(3).distribution(&step_data()).unwrap();
        assert_eq!(dist.n_boots(), 200);
        assert_eq!(dist.n_timepoints(), 5);
    }

    #[test]
    fn test_debug_names_statistic() {
        let text = format!("{:?}", EventDetector::new().statistic(Median));
        assert!(text.contains("median"));
    }

    #[test]
    fn test_seeded_bounds_replay_and_match_run() {
        let data = InputMatrix::from_rows(&[[0.0, 1.0, 3.0], [2.0, -1.0, 4.0], [1.0, 3.0, 2.5]])
            .unwrap();
        let detector = EventDetector::quick().seed(5);

        let first = detector.compute_ci(&data).unwrap();
        assert_eq!(detector.compute_ci(&data).unwrap(), first);
        assert_eq!(detector.run(&data, 1).unwrap().bounds, first);
        assert_eq!(
            detector.distribution(&data).unwrap(),
            detector.distribution(&data).unwrap()
        );
    }
}
