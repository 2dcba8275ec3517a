//! Default analysis parameters.

/// Default number of bootstrap replicates.
pub const DEFAULT_N_BOOTS: usize = 1_000;

/// Default lower percentile of the confidence interval (in percent).
pub const DEFAULT_LOWER_PERCENTILE: f64 = 2.5;

/// Default upper percentile of the confidence interval (in percent).
pub const DEFAULT_UPPER_PERCENTILE: f64 = 97.5;

/// Smallest replicate count that can form a percentile interval.
pub const MIN_N_BOOTS: usize = 2;

/// Stack size for the shared worker pool (8 MB).
pub const WORKER_STACK_BYTES: usize = 8 * 1024 * 1024;
