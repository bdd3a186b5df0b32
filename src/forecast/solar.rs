//! Solar estimate client (forecast.solar public API)

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info};

use super::error::{decode_response, ForecastError};
use crate::domain::{PvForecastPayload, PvSiteConfig};

const SERVICE: &str = "solar forecast service";

#[async_trait]
pub trait PvForecastSource: Send + Sync {
    async fn estimate(&self, site: &PvSiteConfig) -> Result<PvForecastPayload, ForecastError>;
}

#[derive(Clone)]
pub struct ForecastSolarClient {
    base_url: String,
    client: reqwest::Client,
}

impl ForecastSolarClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("energy-forecast-planner/0.2"),
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { base_url, client })
    }

    fn url_for(&self, site: &PvSiteConfig) -> String {
        format!(
            "{}/estimate/{}/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            site.latitude,
            site.longitude,
            site.declination,
            site.azimuth,
            site.kwp
        )
    }
}

#[async_trait]
impl PvForecastSource for ForecastSolarClient {
    async fn estimate(&self, site: &PvSiteConfig) -> Result<PvForecastPayload, ForecastError> {
        let url = self.url_for(site);
        debug!(%url, "calling solar forecast API");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ForecastError::Transport {
                service: SERVICE,
                source,
            })?;

        let payload: PvForecastPayload = decode_response(SERVICE, resp).await?;
        info!(
            latitude = site.latitude,
            longitude = site.longitude,
            "received solar forecast"
        );
        Ok(payload)
    }
}
