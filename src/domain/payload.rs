//! Raw payload shapes exchanged with the forecast services.
//!
//! These mirror the JSON the services speak and are deliberately loose;
//! the pipeline adapters turn them into the fixed series types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values keyed by epoch-millisecond timestamp strings
pub type TimestampedValues = BTreeMap<String, Option<f64>>;

/// Measured household load uploaded by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadHistory {
    /// Primary signal: power (W) per epoch-millisecond timestamp
    #[serde(default)]
    pub power: TimestampedValues,
    /// Every other uploaded signal, forwarded to the load service untouched
    #[serde(flatten)]
    pub signals: serde_json::Map<String, serde_json::Value>,
}

impl LoadHistory {
    pub fn from_power(power: TimestampedValues) -> Self {
        Self {
            power,
            signals: serde_json::Map::new(),
        }
    }
}

/// Quantile forecast returned by the load-forecast service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadForecastPayload {
    /// Quantile label (e.g. `power_0.5`) to its forecast curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantiles: Option<BTreeMap<String, TimestampedValues>>,
}

/// Solar estimate as returned by forecast.solar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PvForecastPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PvResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<serde_json::Value>,
}

/// The `result` object, accepted column-major (the service's own layout)
/// or row-major (one record per timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PvResult {
    Columns(PvColumns),
    Rows(BTreeMap<String, PvRecord>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PvColumns {
    pub watts: BTreeMap<String, Option<f64>>,
    pub watt_hours_period: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub watt_hours: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub watt_hours_day: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PvRecord {
    #[serde(default)]
    pub watts: Option<f64>,
    #[serde(default)]
    pub watt_hours_period: Option<f64>,
    /// Day-cumulative energy, unused downstream
    #[serde(default)]
    pub watt_hours: Option<f64>,
}

impl PvResult {
    /// Row-major view of the result; columns are pivoted over the union of
    /// their timestamps, a timestamp missing from a column reads as null
    pub fn into_rows(self) -> BTreeMap<String, PvRecord> {
        match self {
            PvResult::Rows(rows) => rows,
            PvResult::Columns(cols) => {
                let mut rows: BTreeMap<String, PvRecord> = BTreeMap::new();
                for (ts, v) in cols.watts {
                    rows.entry(ts).or_default().watts = v;
                }
                for (ts, v) in cols.watt_hours_period {
                    rows.entry(ts).or_default().watt_hours_period = v;
                }
                for (ts, v) in cols.watt_hours {
                    rows.entry(ts).or_default().watt_hours = v;
                }
                rows
            }
        }
    }
}
