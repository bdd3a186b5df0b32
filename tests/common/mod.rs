#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use energy_forecast_planner::domain::{
    LoadForecastPayload, LoadHistory, PvForecastPayload, PvRecord, PvResult, PvSiteConfig,
    TimestampedValues,
};
use energy_forecast_planner::forecast::{ForecastError, LoadForecastSource, PvForecastSource};
use reqwest::StatusCode;

pub const DAY_START_MS: i64 = 1_717_200_000_000; // 2024-06-01T00:00:00Z
pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 86_400_000;

pub fn site() -> PvSiteConfig {
    PvSiteConfig {
        latitude: 52.52,
        longitude: 13.4,
        declination: 30.0,
        azimuth: 0.0,
        kwp: 5.0,
    }
}

/// Hourly history covering `days` consecutive UTC dates
pub fn history(days: i64) -> LoadHistory {
    let power = (0..days * 24)
        .map(|h| ((DAY_START_MS - days * DAY_MS + h * HOUR_MS).to_string(), Some(900.0)))
        .collect();
    LoadHistory::from_power(power)
}

pub fn load_forecast(watts: f64) -> LoadForecastPayload {
    let curve: TimestampedValues = (0..24)
        .map(|h| ((DAY_START_MS + h * HOUR_MS).to_string(), Some(watts)))
        .collect();
    LoadForecastPayload {
        quantiles: Some(BTreeMap::from([("power_0.5".to_string(), curve)])),
    }
}

pub fn pv_forecast(watt_hours: f64) -> PvForecastPayload {
    let rows = (10..15)
        .map(|h| {
            (
                format!("2024-06-01 {h:02}:00:00"),
                PvRecord {
                    watts: Some(watt_hours),
                    watt_hours_period: Some(watt_hours),
                    watt_hours: None,
                },
            )
        })
        .collect();
    PvForecastPayload {
        result: Some(PvResult::Rows(rows)),
        message: None,
    }
}

fn unavailable(service: &'static str) -> ForecastError {
    ForecastError::Status {
        service,
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "down".to_string(),
    }
}

/// Load source answering with a fixed payload, or failing when `None`
pub struct FakeLoadSource {
    pub payload: Option<LoadForecastPayload>,
    pub calls: AtomicUsize,
}

impl FakeLoadSource {
    pub fn ok(payload: LoadForecastPayload) -> Self {
        Self {
            payload: Some(payload),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            payload: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoadForecastSource for FakeLoadSource {
    async fn forecast(&self, _history: &LoadHistory) -> Result<LoadForecastPayload, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload
            .clone()
            .ok_or_else(|| unavailable("load forecast service"))
    }
}

pub struct FakePvSource {
    pub payload: Option<PvForecastPayload>,
    pub calls: AtomicUsize,
}

impl FakePvSource {
    pub fn ok(payload: PvForecastPayload) -> Self {
        Self {
            payload: Some(payload),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            payload: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PvForecastSource for FakePvSource {
    async fn estimate(&self, _site: &PvSiteConfig) -> Result<PvForecastPayload, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload
            .clone()
            .ok_or_else(|| unavailable("solar forecast service"))
    }
}
