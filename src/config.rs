use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{Pricing, DEFAULT_ENERGY_PRICE};
use crate::pipeline::load::DEFAULT_MEDIAN_QUANTILE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub load_forecast: LoadForecastConfig,
    pub pv_forecast: PvForecastConfig,
    pub pricing: PricingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 60,
            enable_cors: false,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadForecastConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub median_quantile: String,
}

impl Default for LoadForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "http://load-forecast:8000".to_string(),
            timeout_seconds: 60,
            median_quantile: DEFAULT_MEDIAN_QUANTILE.to_string(),
        }
    }
}

impl LoadForecastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvForecastConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for PvForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.forecast.solar".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl PvForecastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub flex_price: bool,
    pub energy_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            flex_price: false,
            energy_price: DEFAULT_ENERGY_PRICE,
        }
    }
}

impl PricingConfig {
    /// Base pricing; dynamic prices arrive with each planning request
    pub fn pricing(&self) -> Pricing {
        Pricing {
            flex_price: self.flex_price,
            energy_price: self.energy_price,
            total_price: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("EFP__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }
}
