//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::config::PercentileMethod;
use crate::result::Analysis;
use crate::types::EventWindow;

/// Format an Analysis for human-readable terminal output.
pub fn format_analysis(analysis: &Analysis) -> String {
    let meta = &analysis.metadata;
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("bootci\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Data: {} subjects \u{00d7} {} time points\n",
        meta.n_subjects, meta.n_timepoints
    ));
    output.push_str(&format!(
        "  Bootstrap: {} replicates of the {}, seed 0x{:016x}\n",
        meta.n_boots, meta.statistic, meta.seed
    ));
    output.push_str(&format!(
        "  Interval: {:.1}% / {:.1}% ({}{})\n",
        meta.ci_level.lower,
        meta.ci_level.upper,
        format_method(meta.percentile_method),
        if meta.narrowness_correction {
            ", narrowness-corrected"
        } else {
            ""
        }
    ));
    output.push_str(&format!(
        "  Significant points: {} of {}\n",
        analysis.mask.count_significant(),
        meta.n_timepoints
    ));
    output.push('\n');

    if analysis.events.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            format!("No events of {} or more consecutive points", meta.num_consec)
                .green()
                .bold()
        ));
    } else {
        output.push_str(&format!(
            "  {}\n\n",
            format!(
                "{} event(s) of {} or more consecutive points",
                analysis.events.len(),
                meta.num_consec
            )
            .yellow()
            .bold()
        ));
        for window in &analysis.events {
            output.push_str(&format!(
                "    {:>6} \u{2013} {:<6} ({} points) {}\n",
                window.start,
                window.end,
                window.len(),
                direction_label(analysis, window)
            ));
        }
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!("Completed in {:.3} s\n", meta.runtime_secs));

    output
}

fn format_method(method: PercentileMethod) -> &'static str {
    match method {
        PercentileMethod::Linear => "linear interpolation",
        PercentileMethod::OrderStatistic => "order statistic",
    }
}

/// Label a window by whether it lies inside a positive or negative run.
fn direction_label(analysis: &Analysis, window: &EventWindow) -> String {
    let within = |runs: &[EventWindow]| {
        runs.iter()
            .any(|run| run.start <= window.start && window.end <= run.end)
    };

    if within(&analysis.directional.positive) {
        "above reference".red().to_string()
    } else if within(&analysis.directional.negative) {
        "below reference".blue().to_string()
    } else {
        "mixed".yellow().to_string()
    }
}
