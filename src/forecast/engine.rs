use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::{ForecastError, LoadForecastSource, PvForecastSource};
use crate::domain::{LoadHistory, Pricing, PvForecastPayload, PvSiteConfig};
use crate::pipeline::{self, load::check_history, PipelineError, PipelineInput, PlanningReport};
use crate::repo::{ForecastStore, StoreError};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("load forecast unavailable: {0}")]
    LoadForecastUnavailable(#[source] ForecastError),

    #[error("PV configuration not found")]
    PvConfigMissing,

    #[error("PV forecast unavailable and no cached forecast exists: {0}")]
    PvForecastUnavailable(#[source] ForecastError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parameters applied to every planning run
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub median_label: String,
    pub pricing: Pricing,
}

/// Fetches both forecasts, applies the cache policy and runs the pipeline
pub struct ForecastEngine {
    pub load_source: Arc<dyn LoadForecastSource>,
    pub pv_source: Arc<dyn PvForecastSource>,
    pub store: Arc<dyn ForecastStore>,
    pub settings: PlannerSettings,
}

impl ForecastEngine {
    pub fn new(
        load: Arc<dyn LoadForecastSource>,
        pv: Arc<dyn PvForecastSource>,
        store: Arc<dyn ForecastStore>,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            load_source: load,
            pv_source: pv,
            store,
            settings,
        }
    }

    /// Plan from an uploaded history. `total_price` supplies the per-interval
    /// dynamic prices (epoch ms to price) used when flex pricing is enabled.
    ///
    /// The load forecast is fetched and stored before the PV site is looked
    /// up, so a rejected request still refreshes the stored load forecast.
    pub async fn predict(
        &self,
        history: &LoadHistory,
        total_price: &BTreeMap<i64, f64>,
    ) -> Result<PlanningReport, PlanError> {
        let days = check_history(history)?;

        info!(days, "requesting load forecast");
        let load_forecast = self
            .load_source
            .forecast(history)
            .await
            .map_err(PlanError::LoadForecastUnavailable)?;
        self.store.save_load_forecast(&load_forecast).await?;

        let site = self
            .store
            .pv_site_config()
            .await?
            .ok_or(PlanError::PvConfigMissing)?;

        info!(
            latitude = site.latitude,
            longitude = site.longitude,
            "requesting solar forecast"
        );
        let fetched = self.pv_source.estimate(&site).await;
        let pv_forecast = self.resolve_pv_forecast(&site, fetched).await?;

        let mut pricing = self.settings.pricing.clone();
        pricing
            .total_price
            .extend(total_price.iter().map(|(ts, price)| (*ts, *price)));

        let report = pipeline::run(PipelineInput {
            load_forecast: &load_forecast,
            pv_forecast: &pv_forecast,
            median_label: &self.settings.median_label,
            pricing: &pricing,
        })?;

        self.store.save_last_report(&report).await?;
        Ok(report)
    }

    /// A fresh estimate is stored and used; a failed one falls back to the
    /// last stored estimate, however old
    async fn resolve_pv_forecast(
        &self,
        site: &PvSiteConfig,
        fetched: Result<PvForecastPayload, ForecastError>,
    ) -> Result<PvForecastPayload, PlanError> {
        match fetched {
            Ok(payload) => {
                self.store.save_pv_forecast(&payload).await?;
                Ok(payload)
            }
            Err(err) => match self.store.pv_forecast().await? {
                Some(cached) => {
                    warn!(
                        error = %err,
                        service = err.service(),
                        latitude = site.latitude,
                        longitude = site.longitude,
                        "solar forecast unreachable, using cached forecast"
                    );
                    Ok(cached)
                }
                None => Err(PlanError::PvForecastUnavailable(err)),
            },
        }
    }
}
