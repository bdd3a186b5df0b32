//! Surplus-window detector
//!
//! Scans the "no grid draw" signal in time order and extracts maximal
//! contiguous runs. A run ends at the first interval that draws from the
//! grid again (exclusive end), or at the last interval when the series
//! ends inside the run.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{SplitInterval, SurplusWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    OutsideRun,
    InsideRun { start: DateTime<Utc> },
}

/// Gap between the last two intervals, one hour for shorter series
fn cadence(intervals: &[SplitInterval]) -> Duration {
    match intervals {
        [.., prev, last] if last.time > prev.time => last.time.at() - prev.time.at(),
        _ => Duration::hours(1),
    }
}

pub fn detect_windows(intervals: &[SplitInterval]) -> Vec<SurplusWindow> {
    let mut windows = Vec::new();
    let mut state = RunState::OutsideRun;

    for interval in intervals {
        state = match (state, interval.is_surplus()) {
            (RunState::OutsideRun, true) => RunState::InsideRun {
                start: interval.time.at(),
            },
            (RunState::InsideRun { start }, false) => {
                windows.push(SurplusWindow {
                    start,
                    end: interval.time.at(),
                });
                RunState::OutsideRun
            }
            (unchanged, _) => unchanged,
        };
    }

    if let (RunState::InsideRun { start }, Some(last)) = (state, intervals.last()) {
        let last_at = last.time.at();
        // A run opened by the final interval alone still needs start < end
        let end = if last_at > start {
            last_at
        } else {
            last_at + cadence(intervals)
        };
        windows.push(SurplusWindow { start, end });
    }

    windows
}

/// Window starts as `HH:MM`; durations and ends are not part of this list
pub fn start_times(windows: &[SurplusWindow]) -> Vec<String> {
    windows
        .iter()
        .map(|w| w.start.format("%H:%M").to_string())
        .collect()
}

/// Vertical annotation positions for a chart: every start and every end
pub fn markers(windows: &[SurplusWindow]) -> Vec<DateTime<Utc>> {
    windows.iter().flat_map(|w| [w.start, w.end]).collect()
}
