//! Reconciliation pipeline
//!
//! Stages run strictly in order: the two adapters, the reconciler, the
//! splitter, then the surplus detector and the summary over the same split
//! series. Every stage is a pure function of its inputs; nothing is shared
//! between runs.

pub mod error;
pub mod load;
pub mod pv;
pub mod reconcile;
pub mod split;
pub mod summary;
pub mod surplus;

pub use error::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{LoadForecastPayload, Pricing, PvForecastPayload, SplitInterval, Summary, SurplusWindow};

/// Everything one run consumes
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    pub load_forecast: &'a LoadForecastPayload,
    pub pv_forecast: &'a PvForecastPayload,
    pub median_label: &'a str,
    pub pricing: &'a Pricing,
}

/// Result of one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningReport {
    pub generated_at: DateTime<Utc>,
    pub intervals: Vec<SplitInterval>,
    pub windows: Vec<SurplusWindow>,
    pub summary: Summary,
}

/// Series and annotations needed to draw the planning chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub generated_at: DateTime<Utc>,
    pub intervals: Vec<SplitInterval>,
    pub markers: Vec<DateTime<Utc>>,
}

impl PlanningReport {
    pub fn chart(&self) -> ChartData {
        ChartData {
            generated_at: self.generated_at,
            intervals: self.intervals.clone(),
            markers: surplus::markers(&self.windows),
        }
    }
}

pub fn run(input: PipelineInput<'_>) -> Result<PlanningReport, PipelineError> {
    let load = load::adapt(input.load_forecast, input.median_label)?;
    let pv = pv::adapt(input.pv_forecast)?;
    let merged = reconcile::reconcile(&load, &pv);
    let intervals = split::split(&merged, input.pricing)?;
    let windows = surplus::detect_windows(&intervals);
    let summary = summary::summarize(&intervals, &windows);

    info!(
        intervals = intervals.len(),
        pv_hours = pv.len(),
        windows = windows.len(),
        surplus_minutes = windows.iter().map(|w| w.duration().num_minutes()).sum::<i64>(),
        total_power_kwh = summary.total_power_kwh,
        total_solar_kwh = summary.total_solar_kwh,
        total_cost = summary.total_cost,
        "planning run complete"
    );

    Ok(PlanningReport {
        generated_at: Utc::now(),
        intervals,
        windows,
        summary,
    })
}
