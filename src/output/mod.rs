//! Rendering analysis results as JSON or terminal text.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_analysis;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::{CiLevel, PercentileMethod};
    use crate::result::{Analysis, Metadata};
    use crate::types::{CiBounds, DirectionalEvents, EventWindow};

    pub fn make_test_analysis(events: Vec<EventWindow>) -> Analysis {
        let mask = vec![false, true, true, true, false, true];
        Analysis {
            bounds: CiBounds::new(
                vec![-0.5, 0.25, 0.5, 0.75, -0.125, 0.25],
                vec![0.5, 1.25, 1.5, 1.75, 0.875, 1.25],
            )
            .unwrap(),
            mask: mask.into(),
            directional: DirectionalEvents {
                positive: events.clone(),
                negative: Vec::new(),
            },
            events,
            metadata: Metadata {
                n_subjects: 12,
                n_timepoints: 6,
                n_boots: 1000,
                seed: 0x2a,
                ci_level: CiLevel::default(),
                percentile_method: PercentileMethod::Linear,
                narrowness_correction: false,
                num_consec: 3,
                statistic: "mean".to_string(),
                runtime_secs: 0.25,
            },
        }
    }
}
