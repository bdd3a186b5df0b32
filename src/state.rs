use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::forecast::{
    ForecastEngine, ForecastSolarClient, HttpLoadForecaster, LoadForecastSource, PlannerSettings,
    PvForecastSource,
};
use crate::repo::{FileStore, ForecastStore};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ForecastEngine>,
    pub store: Arc<dyn ForecastStore>,
}

impl AppState {
    /// Wire the HTTP forecast clients and the file store from configuration
    pub fn new(cfg: &Config) -> Result<Self> {
        let load: Arc<dyn LoadForecastSource> = Arc::new(HttpLoadForecaster::new(
            cfg.load_forecast.base_url.clone(),
            cfg.load_forecast.timeout(),
        )?);
        let pv: Arc<dyn PvForecastSource> = Arc::new(ForecastSolarClient::new(
            cfg.pv_forecast.base_url.clone(),
            cfg.pv_forecast.timeout(),
        )?);
        let file_store = FileStore::new(cfg.storage.data_dir.clone());
        info!(data_dir = %file_store.data_dir().display(), "using file store");

        let store: Arc<dyn ForecastStore> = Arc::new(file_store);
        Ok(Self::with_parts(load, pv, store, cfg))
    }

    pub fn with_parts(
        load: Arc<dyn LoadForecastSource>,
        pv: Arc<dyn PvForecastSource>,
        store: Arc<dyn ForecastStore>,
        cfg: &Config,
    ) -> Self {
        let settings = PlannerSettings {
            median_label: cfg.load_forecast.median_quantile.clone(),
            pricing: cfg.pricing.pricing(),
        };
        let engine = Arc::new(ForecastEngine::new(load, pv, store.clone(), settings));
        Self { engine, store }
    }
}
