//! Series reconciler
//!
//! Left join of the load series against the PV day shape on hour of day.
//! The load series decides the span: every load sample yields exactly one
//! interval, in load order, and hours without PV read as zero generation.

use tracing::{debug, warn};

use crate::domain::{LoadSample, MergedInterval, PvSample};

/// PV sample per hour of day; the first sample in time order wins
fn index_by_hour(pv: &[PvSample]) -> [Option<&PvSample>; 24] {
    let mut by_hour: [Option<&PvSample>; 24] = [None; 24];
    let mut ordered: Vec<&PvSample> = pv.iter().collect();
    ordered.sort_by_key(|s| s.time);

    for sample in ordered {
        let slot = &mut by_hour[sample.time.hour_of_day() as usize];
        if let Some(kept) = *slot {
            warn!(
                hour = sample.time.hour_of_day(),
                kept = %kept.time,
                ignored = %sample.time,
                "several pv samples share an hour, keeping the earliest"
            );
        } else {
            *slot = Some(sample);
        }
    }
    by_hour
}

pub fn reconcile(load: &[LoadSample], pv: &[PvSample]) -> Vec<MergedInterval> {
    let by_hour = index_by_hour(pv);

    let merged: Vec<MergedInterval> = load
        .iter()
        .map(|sample| {
            let matched = by_hour[sample.time.hour_of_day() as usize];
            MergedInterval {
                time: sample.time,
                load_w: sample.median_w,
                pv_w: matched.map_or(0.0, |p| p.watts),
                pv_period_wh: matched.map_or(0.0, |p| p.watt_hours_period),
            }
        })
        .collect();

    debug!(
        intervals = merged.len(),
        pv_hours = by_hour.iter().filter(|h| h.is_some()).count(),
        "reconciled load and pv series"
    );
    merged
}
