//! Consumption splitter
//!
//! Per interval: the solar share is what generation can cover, the rest
//! is drawn from the grid and priced.

use super::error::PipelineError;
use crate::domain::{MergedInterval, Pricing, SplitInterval};

pub fn split_interval(
    interval: &MergedInterval,
    pricing: &Pricing,
) -> Result<SplitInterval, PipelineError> {
    let power_kwh = interval.load_w / 1000.0;
    let solar_kwh = interval.pv_period_wh / 1000.0;
    let consumption_solar_kwh = power_kwh.min(solar_kwh);
    // Clamp only the grid draw, negative loads stay visible above
    let consumption_grid_kwh = (power_kwh - consumption_solar_kwh).max(0.0);

    let price = pricing
        .effective_price(&interval.time)
        .ok_or_else(|| PipelineError::MissingDynamicPrice {
            timestamp: interval.time.to_string(),
        })?;

    let energy_saved_percentage = if power_kwh == 0.0 {
        None
    } else {
        Some(solar_kwh / power_kwh * 100.0)
    };

    Ok(SplitInterval {
        time: interval.time,
        load_w: interval.load_w,
        pv_w: interval.pv_w,
        pv_period_wh: interval.pv_period_wh,
        power_kwh,
        solar_kwh,
        consumption_solar_kwh,
        consumption_grid_kwh,
        cost_grid: consumption_grid_kwh * price,
        energy_saved_percentage,
    })
}

pub fn split(
    merged: &[MergedInterval],
    pricing: &Pricing,
) -> Result<Vec<SplitInterval>, PipelineError> {
    merged.iter().map(|m| split_interval(m, pricing)).collect()
}
