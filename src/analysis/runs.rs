//! Run-length filtering of significance masks into event windows.
//!
//! A single left-to-right scan tracks the start of the current run of
//! `true` values. A run is closed by the first `false` after it or by the
//! end of the mask, and kept only if it spans at least `num_consec` points.
//! Runs separated by a single `false` are never merged.

use crate::error::{Error, Result};
use crate::types::EventWindow;

/// Collapse `mask` into maximal runs of at least `num_consec` true values.
///
/// Windows are inclusive, ordered by start index and non-overlapping. With
/// `num_consec == 1` every maximal run is returned unchanged.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `num_consec` is zero.
pub fn find_runs(mask: &[bool], num_consec: usize) -> Result<Vec<EventWindow>> {
    if num_consec < 1 {
        return Err(Error::invalid("num_consec must be at least 1, got 0"));
    }

    let mut windows = Vec::new();
    let mut run_start: Option<usize> = None;

    for (t, &significant) in mask.iter().enumerate() {
        match (significant, run_start) {
            (true, None) => run_start = Some(t),
            (false, Some(start)) => {
                push_if_long(&mut windows, start, t - 1, num_consec);
                run_start = None;
            }
            _ => {}
        }
    }

    // A run touching the last index is closed here.
    if let Some(start) = run_start {
        push_if_long(&mut windows, start, mask.len() - 1, num_consec);
    }

    tracing::trace!(
        n_timepoints = mask.len(),
        num_consec,
        n_windows = windows.len(),
        "run-length filter"
    );
    Ok(windows)
}

fn push_if_long(windows: &mut Vec<EventWindow>, start: usize, end: usize, num_consec: usize) {
    if end - start + 1 >= num_consec {
        windows.push(EventWindow::new(start, end));
    }
}

/// Total number of time points covered by `windows`.
pub fn covered_len(windows: &[EventWindow]) -> usize {
    windows.iter().map(EventWindow::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(start: usize, end: usize) -> EventWindow {
        EventWindow::new(start, end)
    }

    #[test]
    fn test_rejects_zero_num_consec() {
        assert!(find_runs(&[true], 0).unwrap_err().is_invalid_input());
        assert!(find_runs(&[], 0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_empty_and_all_false() {
        assert!(find_runs(&[], 1).unwrap().is_empty());
        assert!(find_runs(&[false; 8], 1).unwrap().is_empty());
    }

    #[test]
    fn test_num_consec_one_returns_every_run() {
        let mask = [true, false, true, true, false, false, true];
        assert_eq!(
            find_runs(&mask, 1).unwrap(),
            vec![w(0, 0), w(2, 3), w(6, 6)]
        );
    }

    #[test]
    fn test_short_runs_dropped() {
        let mask = [false, true, true, true, false, true, true, false];
        assert_eq!(find_runs(&mask, 3).unwrap(), vec![w(1, 3)]);
        assert_eq!(find_runs(&mask, 2).unwrap(), vec![w(1, 3), w(5, 6)]);
        assert!(find_runs(&mask, 4).unwrap().is_empty());
    }

    #[test]
    fn test_run_touching_end_is_closed() {
        let mask = [false, false, true, true, true];
        assert_eq!(find_runs(&mask, 3).unwrap(), vec![w(2, 4)]);
        assert_eq!(find_runs(&[true; 4], 4).unwrap(), vec![w(0, 3)]);
    }

    #[test]
    fn test_single_gap_never_merges() {
        let mask = [true, true, false, true, true];
        assert_eq!(find_runs(&mask, 2).unwrap(), vec![w(0, 1), w(3, 4)]);
        assert!(find_runs(&mask, 3).unwrap().is_empty());
    }

    #[test]
    fn test_exact_length_is_kept() {
        assert_eq!(find_runs(&[true, true], 2).unwrap(), vec![w(0, 1)]);
    }

    #[test]
    fn test_coverage_non_increasing_in_num_consec() {
        let mask = [
            true, false, true, true, false, true, true, true, false, true, true, true, true,
        ];
        let mut previous = usize::MAX;
        for k in 1..=6 {
            let covered = covered_len(&find_runs(&mask, k).unwrap());
            assert!(covered <= previous);
            previous = covered;
        }
        assert_eq!(covered_len(&find_runs(&mask, 1).unwrap()), 10);
        assert_eq!(covered_len(&find_runs(&mask, 4).unwrap()), 4);
    }
}
