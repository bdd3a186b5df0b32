//! JSON flat-file store, one file per entry under a data directory

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ForecastStore, StoreError, StoreResult};
use crate::domain::{LoadForecastPayload, PvForecastPayload, PvSiteConfig};
use crate::pipeline::PlanningReport;

const PV_SITE_CONFIG: &str = "form_data.json";
const LOAD_FORECAST: &str = "load_response.json";
const PV_FORECAST: &str = "solar_prediction.json";
const LAST_REPORT: &str = "last_report.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        let path = self.data_dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Serde { path, source })
    }

    async fn write<T: Serialize + Sync>(&self, name: &str, value: &T) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })?;

        let path = self.data_dir.join(name);
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serde {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "stored");
        Ok(())
    }
}

#[async_trait]
impl ForecastStore for FileStore {
    async fn pv_site_config(&self) -> StoreResult<Option<PvSiteConfig>> {
        self.read(PV_SITE_CONFIG).await
    }

    async fn save_pv_site_config(&self, config: &PvSiteConfig) -> StoreResult<()> {
        self.write(PV_SITE_CONFIG, config).await
    }

    async fn load_forecast(&self) -> StoreResult<Option<LoadForecastPayload>> {
        self.read(LOAD_FORECAST).await
    }

    async fn save_load_forecast(&self, payload: &LoadForecastPayload) -> StoreResult<()> {
        self.write(LOAD_FORECAST, payload).await
    }

    async fn pv_forecast(&self) -> StoreResult<Option<PvForecastPayload>> {
        self.read(PV_FORECAST).await
    }

    async fn save_pv_forecast(&self, payload: &PvForecastPayload) -> StoreResult<()> {
        self.write(PV_FORECAST, payload).await
    }

    async fn last_report(&self) -> StoreResult<Option<PlanningReport>> {
        self.read(LAST_REPORT).await
    }

    async fn save_last_report(&self, report: &PlanningReport) -> StoreResult<()> {
        self.write(LAST_REPORT, report).await
    }
}
