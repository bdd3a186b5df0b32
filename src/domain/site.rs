use serde::{Deserialize, Serialize};
use validator::Validate;

/// PV installation parameters used to request a solar estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PvSiteConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Panel tilt, 0 = horizontal, 90 = vertical
    #[validate(range(min = 0.0, max = 90.0))]
    pub declination: f64,
    /// -180 = north, -90 = east, 0 = south, 90 = west
    #[validate(range(min = -180.0, max = 180.0))]
    pub azimuth: f64,
    /// Installed peak power (kWp)
    #[validate(range(min = 0.0))]
    pub kwp: f64,
}
