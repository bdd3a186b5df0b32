//! Energy Forecast Planner
//!
//! Reconciles a household load forecast with a photovoltaic generation
//! forecast, splits consumption into solar and grid shares, prices the grid
//! share and finds the windows in which generation covers all load.

pub mod api;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod pipeline;
pub mod repo;
pub mod state;
pub mod telemetry;
