//! Summary aggregator: run totals and the savings ratio over the split series

use tracing::warn;

use super::surplus::start_times;
use crate::domain::{SplitInterval, Summary, SurplusWindow};

/// `solar / power * 100`, undefined (`None`) when there is no load
pub fn savings_percentage(total_solar_kwh: f64, total_power_kwh: f64) -> Option<f64> {
    if total_power_kwh == 0.0 {
        None
    } else {
        Some(total_solar_kwh / total_power_kwh * 100.0)
    }
}

pub fn summarize(intervals: &[SplitInterval], windows: &[SurplusWindow]) -> Summary {
    let total_power_kwh: f64 = intervals.iter().map(|i| i.power_kwh).sum();
    let total_solar_kwh: f64 = intervals.iter().map(|i| i.solar_kwh).sum();

    let total_savings_percentage = savings_percentage(total_solar_kwh, total_power_kwh);
    if total_savings_percentage.is_none() {
        warn!(
            intervals = intervals.len(),
            "total load is zero, savings percentage is undefined"
        );
    }

    Summary {
        total_cost: intervals.iter().map(|i| i.cost_grid).sum(),
        total_power_kwh,
        total_solar_kwh,
        total_consumption_solar_kwh: intervals.iter().map(|i| i.consumption_solar_kwh).sum(),
        total_consumption_grid_kwh: intervals.iter().map(|i| i.consumption_grid_kwh).sum(),
        total_savings_percentage,
        surplus_times: start_times(windows),
    }
}
