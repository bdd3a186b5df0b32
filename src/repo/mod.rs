//! Cache and configuration store
//!
//! The planner never touches the filesystem directly; it is handed a
//! [`ForecastStore`] and decides itself when cached data may be used.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{LoadForecastPayload, PvForecastPayload, PvSiteConfig};
use crate::pipeline::PlanningReport;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent state shared between planning requests. Reads of
/// never-written entries return `Ok(None)`.
#[async_trait]
pub trait ForecastStore: Send + Sync {
    async fn pv_site_config(&self) -> StoreResult<Option<PvSiteConfig>>;
    async fn save_pv_site_config(&self, config: &PvSiteConfig) -> StoreResult<()>;

    async fn load_forecast(&self) -> StoreResult<Option<LoadForecastPayload>>;
    async fn save_load_forecast(&self, payload: &LoadForecastPayload) -> StoreResult<()>;

    async fn pv_forecast(&self) -> StoreResult<Option<PvForecastPayload>>;
    async fn save_pv_forecast(&self, payload: &PvForecastPayload) -> StoreResult<()>;

    async fn last_report(&self) -> StoreResult<Option<PlanningReport>>;
    async fn save_last_report(&self, report: &PlanningReport) -> StoreResult<()>;
}
