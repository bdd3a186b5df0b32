//! Load series adapter
//!
//! Gates the uploaded history on its day coverage and turns the quantile
//! forecast of the load service into an ordered [`LoadSample`] series.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::error::{PipelineError, MIN_HISTORY_DAYS};
use crate::domain::{LoadForecastPayload, LoadHistory, LoadSample, TimePoint};

const HISTORY: &str = "load history";
const FORECAST: &str = "load forecast";

/// Median quantile label emitted by the load-forecast service
pub const DEFAULT_MEDIAN_QUANTILE: &str = "power_0.5";

/// Parse an epoch-millisecond key such as `"1717200000000"`
pub fn parse_millis_key(key: &str, source_name: &'static str) -> Result<TimePoint, PipelineError> {
    let ms: i64 = key
        .trim()
        .parse()
        .map_err(|_| PipelineError::malformed(source_name, format!("timestamp key {key:?} is not epoch milliseconds")))?;
    TimePoint::from_millis(ms)
        .ok_or_else(|| PipelineError::malformed(source_name, format!("timestamp {ms} out of range")))
}

/// Require at least [`MIN_HISTORY_DAYS`] distinct UTC dates in the primary
/// `power` signal. Returns the number of distinct dates.
pub fn check_history(history: &LoadHistory) -> Result<usize, PipelineError> {
    let mut days = BTreeSet::new();
    for key in history.power.keys() {
        let tp = parse_millis_key(key, HISTORY)?;
        days.insert(tp.at().date_naive());
    }

    let found_days = days.len();
    debug!(found_days, samples = history.power.len(), "checked load history coverage");

    if found_days < MIN_HISTORY_DAYS {
        return Err(PipelineError::InsufficientHistory { found_days });
    }
    Ok(found_days)
}

/// Adapt the quantile forecast into one sample per forecast timestamp.
///
/// Every timestamp present in any quantile signal must carry a median value.
pub fn adapt(
    payload: &LoadForecastPayload,
    median_label: &str,
) -> Result<Vec<LoadSample>, PipelineError> {
    let quantiles = payload
        .quantiles
        .as_ref()
        .ok_or_else(|| PipelineError::malformed(FORECAST, "missing `quantiles`"))?;

    if !quantiles.contains_key(median_label) {
        return Err(PipelineError::malformed(
            FORECAST,
            format!("missing median quantile `{median_label}`"),
        ));
    }

    let mut by_time: BTreeMap<TimePoint, BTreeMap<String, f64>> = BTreeMap::new();
    for (label, curve) in quantiles {
        // Keys normalising to the same instant within one curve are duplicates
        let mut seen = BTreeSet::new();
        for (key, value) in curve {
            let tp = parse_millis_key(key, FORECAST)?;
            if !seen.insert(tp) {
                return Err(PipelineError::malformed(
                    FORECAST,
                    format!("duplicate timestamp {} in `{label}`", tp.millis()),
                ));
            }
            let entry = by_time.entry(tp).or_default();
            if let Some(v) = value {
                entry.insert(label.clone(), *v);
            }
        }
    }

    by_time
        .into_iter()
        .map(|(time, quantiles)| {
            let median_w = quantiles.get(median_label).copied().ok_or_else(|| {
                PipelineError::malformed(
                    FORECAST,
                    format!("no `{median_label}` value at {time}"),
                )
            })?;
            Ok(LoadSample {
                time,
                median_w,
                quantiles,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DAY_MS: i64 = 86_400_000;
    const HOUR_MS: i64 = 3_600_000;
    // 2024-06-01T00:00:00Z
    const T0: i64 = 1_717_200_000_000;

    fn history_over_days(days: i64) -> LoadHistory {
        let mut power = BTreeMap::new();
        for d in 0..days {
            for h in [0, 12, 23] {
                power.insert((T0 + d * DAY_MS + h * HOUR_MS).to_string(), Some(400.0));
            }
        }
        LoadHistory::from_power(power)
    }

    fn forecast(curves: &[(&str, &[(i64, Option<f64>)])]) -> LoadForecastPayload {
        let quantiles = curves
            .iter()
            .map(|(label, points)| {
                let curve = points
                    .iter()
                    .map(|(ts, v)| (ts.to_string(), *v))
                    .collect();
                (label.to_string(), curve)
            })
            .collect();
        LoadForecastPayload {
            quantiles: Some(quantiles),
        }
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, false)]
    #[case(7, false)]
    #[case(8, true)]
    #[case(14, true)]
    fn test_history_gate(#[case] days: i64, #[case] ok: bool) {
        let result = check_history(&history_over_days(days));
        assert_eq!(result.is_ok(), ok, "{days} days -> {result:?}");
        if !ok {
            assert_eq!(
                result,
                Err(PipelineError::InsufficientHistory {
                    found_days: days as usize
                })
            );
        }
    }

    #[test]
    fn test_history_counts_utc_dates_not_samples() {
        // Many samples within a single day still count as one day
        let mut power = BTreeMap::new();
        for m in 0..(24 * 60) {
            power.insert((T0 + m * 60_000).to_string(), Some(1.0));
        }
        let err = check_history(&LoadHistory::from_power(power)).unwrap_err();
        assert_eq!(err, PipelineError::InsufficientHistory { found_days: 1 });
    }

    #[test]
    fn test_history_rejects_non_numeric_keys() {
        let history =
            LoadHistory::from_power(BTreeMap::from([("yesterday".to_string(), Some(1.0))]));
        assert!(matches!(
            check_history(&history),
            Err(PipelineError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_adapt_orders_samples_and_tags_hour() {
        let payload = forecast(&[
            (
                "power_0.5",
                &[(T0 + 2 * HOUR_MS, Some(300.0)), (T0, Some(100.0)), (T0 + HOUR_MS, Some(200.0))],
            ),
            ("power_0.9", &[(T0, Some(150.0))]),
        ]);

        let samples = adapt(&payload, DEFAULT_MEDIAN_QUANTILE).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(
            samples.iter().map(|s| s.time.hour_of_day()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(samples[0].median_w, 100.0);
        assert_eq!(samples[0].quantiles.get("power_0.9"), Some(&150.0));
        assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_adapt_requires_quantiles() {
        let err = adapt(&LoadForecastPayload::default(), DEFAULT_MEDIAN_QUANTILE).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedPayload { .. }));
    }

    #[test]
    fn test_adapt_requires_median_signal() {
        let payload = forecast(&[("power_0.9", &[(T0, Some(1.0))])]);
        let err = adapt(&payload, DEFAULT_MEDIAN_QUANTILE).unwrap_err();
        assert!(err.to_string().contains("power_0.5"));
    }

    #[test]
    fn test_adapt_rejects_timestamp_without_median() {
        let payload = forecast(&[
            ("power_0.5", &[(T0, Some(1.0)), (T0 + HOUR_MS, None)]),
        ]);
        assert!(adapt(&payload, DEFAULT_MEDIAN_QUANTILE).is_err());
    }

    #[test]
    fn test_adapt_rejects_duplicate_instants() {
        let mut curve = BTreeMap::new();
        curve.insert(T0.to_string(), Some(1.0));
        curve.insert(format!("0{T0}"), Some(2.0));
        let payload = LoadForecastPayload {
            quantiles: Some(BTreeMap::from([("power_0.5".to_string(), curve)])),
        };
        let err = adapt(&payload, DEFAULT_MEDIAN_QUANTILE).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
