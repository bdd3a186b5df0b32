use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Time
// ============================================================================

/// An absolute UTC instant together with the hour of day it falls in.
///
/// The hour is derived once at construction and is the join key between
/// the multi-day load series and the single-day PV shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimePoint {
    at: DateTime<Utc>,
    hour_of_day: u32,
}

impl TimePoint {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            hour_of_day: at.hour(),
        }
    }

    /// Build from epoch milliseconds, `None` when out of chrono's range
    pub fn from_millis(ms: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(ms).single().map(Self::new)
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn millis(&self) -> i64 {
        self.at.timestamp_millis()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.hour_of_day
    }

    /// Hour and minute without the date, e.g. `"09:15"`
    pub fn hh_mm(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.to_rfc3339())
    }
}

// ============================================================================
// Adapted input series
// ============================================================================

/// One timestamp of the household load forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
    pub time: TimePoint,
    /// Median quantile power (W), the value used downstream
    pub median_w: f64,
    /// Every quantile present at this timestamp, keyed by label
    pub quantiles: BTreeMap<String, f64>,
}

/// One hour of the representative PV day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvSample {
    pub time: TimePoint,
    /// Instantaneous power (W)
    pub watts: f64,
    /// Energy produced during the period ending at `time` (Wh)
    pub watt_hours_period: f64,
}

// ============================================================================
// Derived series
// ============================================================================

/// A load interval with the PV values matched to its hour of day.
///
/// PV fields are zero, never absent, when no PV sample shares the hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedInterval {
    pub time: TimePoint,
    pub load_w: f64,
    pub pv_w: f64,
    pub pv_period_wh: f64,
}

/// A merged interval with its consumption split into solar and grid parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitInterval {
    pub time: TimePoint,
    pub load_w: f64,
    pub pv_w: f64,
    pub pv_period_wh: f64,
    pub power_kwh: f64,
    pub solar_kwh: f64,
    pub consumption_solar_kwh: f64,
    pub consumption_grid_kwh: f64,
    pub cost_grid: f64,
    /// `solar_kwh / power_kwh * 100`, `None` for an interval without load
    pub energy_saved_percentage: Option<f64>,
}

impl SplitInterval {
    /// True when on-site generation covers the whole interval
    pub fn is_surplus(&self) -> bool {
        self.consumption_grid_kwh == 0.0
    }
}

/// A maximal run of fully solar-covered intervals, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SurplusWindow {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Headline totals for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_cost: f64,
    pub total_power_kwh: f64,
    pub total_solar_kwh: f64,
    pub total_consumption_solar_kwh: f64,
    pub total_consumption_grid_kwh: f64,
    /// `None` when there was no load at all: the ratio is undefined
    pub total_savings_percentage: Option<f64>,
    /// Surplus window start times as `HH:MM`
    pub surplus_times: Vec<String>,
}

impl Summary {
    pub fn savings_undefined(&self) -> bool {
        self.total_savings_percentage.is_none()
    }
}
