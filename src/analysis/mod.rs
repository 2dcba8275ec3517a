//! Analysis stages downstream of the bootstrap.
//!
//! 1. **CI estimation** ([`ci`]): percentile intervals per time point
//! 2. **Significance** ([`significance`]): reference strictly outside the interval
//! 3. **Run-length filter** ([`runs`]): keep runs of at least `num_consec` points

mod ci;
mod runs;
mod significance;

pub use ci::{apply_narrowness_correction, run_ci_estimator, CiInput};
pub use runs::{covered_len, find_runs};
pub use significance::{directional_masks, significance_mask};
