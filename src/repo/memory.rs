use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ForecastStore, StoreResult};
use crate::domain::{LoadForecastPayload, PvForecastPayload, PvSiteConfig};
use crate::pipeline::PlanningReport;

/// In-process store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    pv_site_config: RwLock<Option<PvSiteConfig>>,
    load_forecast: RwLock<Option<LoadForecastPayload>>,
    pv_forecast: RwLock<Option<PvForecastPayload>>,
    last_report: RwLock<Option<PlanningReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pv_site_config(config: PvSiteConfig) -> Self {
        Self {
            pv_site_config: RwLock::new(Some(config)),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ForecastStore for MemoryStore {
    async fn pv_site_config(&self) -> StoreResult<Option<PvSiteConfig>> {
        Ok(*self.pv_site_config.read().await)
    }

    async fn save_pv_site_config(&self, config: &PvSiteConfig) -> StoreResult<()> {
        *self.pv_site_config.write().await = Some(*config);
        Ok(())
    }

    async fn load_forecast(&self) -> StoreResult<Option<LoadForecastPayload>> {
        Ok(self.load_forecast.read().await.clone())
    }

    async fn save_load_forecast(&self, payload: &LoadForecastPayload) -> StoreResult<()> {
        *self.load_forecast.write().await = Some(payload.clone());
        Ok(())
    }

    async fn pv_forecast(&self) -> StoreResult<Option<PvForecastPayload>> {
        Ok(self.pv_forecast.read().await.clone())
    }

    async fn save_pv_forecast(&self, payload: &PvForecastPayload) -> StoreResult<()> {
        *self.pv_forecast.write().await = Some(payload.clone());
        Ok(())
    }

    async fn last_report(&self) -> StoreResult<Option<PlanningReport>> {
        Ok(self.last_report.read().await.clone())
    }

    async fn save_last_report(&self, report: &PlanningReport) -> StoreResult<()> {
        *self.last_report.write().await = Some(report.clone());
        Ok(())
    }
}
