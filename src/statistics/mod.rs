//! Statistical machinery for bootstrap confidence intervals.
//!
//! - Subject resampling with injectable, per-replicate RNG streams
//! - Pluggable per-replicate aggregation (mean, median, closures)
//! - Bootstrap distribution accumulation, parallel when enabled
//! - Percentile extraction from sorted replicates

mod aggregate;
mod distribution;
mod quantile;
mod resample;

pub use aggregate::{Aggregator, Mean, Median};
pub use distribution::{bootstrap_distribution, BootDistribution};
pub use quantile::{order_statistic_bounds, percentile_sorted, sort_ascending};
pub use resample::{
    counter_rng_seed, replicate_rng, resample_subjects, resample_subjects_into, resolve_seed,
    IndexSource,
};
