//! PV series adapter
//!
//! Reduces a multi-day solar estimate to the representative shape of its
//! first day: cumulative fields are dropped, incomplete rows are dropped,
//! and only the earliest calendar date is kept.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use super::error::PipelineError;
use crate::domain::{PvForecastPayload, PvSample, TimePoint};

const PV: &str = "pv forecast";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a forecast timestamp. Offsets are dropped in favour of the
/// wall-clock of the site; naive timestamps are read as UTC wall-clock.
pub fn parse_timestamp(raw: &str) -> Result<TimePoint, PipelineError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(TimePoint::new(dt.naive_local().and_utc()));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| TimePoint::new(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
        .ok_or_else(|| PipelineError::malformed(PV, format!("unparseable timestamp {raw:?}")))
}

pub fn adapt(payload: &PvForecastPayload) -> Result<Vec<PvSample>, PipelineError> {
    let result = payload
        .result
        .clone()
        .ok_or_else(|| PipelineError::malformed(PV, "missing `result`"))?;

    let rows = result.into_rows();
    let total_rows = rows.len();

    let mut samples = Vec::with_capacity(total_rows);
    for (key, record) in rows {
        let time = parse_timestamp(&key)?;
        // watt_hours is day-cumulative and not part of the sample
        if let (Some(watts), Some(watt_hours_period)) = (record.watts, record.watt_hours_period) {
            samples.push(PvSample {
                time,
                watts,
                watt_hours_period,
            });
        }
    }
    samples.sort_by_key(|s| s.time);

    // Distinct spellings of one instant would put two samples on one timestamp
    if let Some(pair) = samples.windows(2).find(|pair| pair[0].time == pair[1].time) {
        return Err(PipelineError::malformed(
            PV,
            format!("duplicate timestamp {}", pair[1].time),
        ));
    }

    let Some(first_day) = samples.first().map(|s| s.time.at().date_naive()) else {
        debug!(total_rows, "pv forecast has no complete rows");
        return Ok(samples);
    };
    samples.retain(|s| s.time.at().date_naive() == first_day);

    debug!(
        total_rows,
        kept = samples.len(),
        day = %first_day,
        "adapted pv forecast to representative day"
    );
    Ok(samples)
}
