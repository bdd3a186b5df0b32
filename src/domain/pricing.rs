use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TimePoint;

/// Flat grid price in currency units per kWh (14 ct/kWh)
pub const DEFAULT_ENERGY_PRICE: f64 = 0.14;

/// Grid pricing for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Use the per-interval `total_price` instead of the flat rate
    pub flex_price: bool,
    pub energy_price: f64,
    /// Dynamic price per interval, keyed by epoch milliseconds
    #[serde(default)]
    pub total_price: BTreeMap<i64, f64>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self::flat(DEFAULT_ENERGY_PRICE)
    }
}

impl Pricing {
    pub fn flat(energy_price: f64) -> Self {
        Self {
            flex_price: false,
            energy_price,
            total_price: BTreeMap::new(),
        }
    }

    pub fn flex(total_price: BTreeMap<i64, f64>) -> Self {
        Self {
            flex_price: true,
            energy_price: DEFAULT_ENERGY_PRICE,
            total_price,
        }
    }

    /// Price applying to the interval at `time`; `None` only under flex
    /// pricing when no dynamic price covers the interval
    pub fn effective_price(&self, time: &TimePoint) -> Option<f64> {
        if self.flex_price {
            self.total_price.get(&time.millis()).copied()
        } else {
            Some(self.energy_price)
        }
    }
}
