use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info};

use super::error::{decode_response, ForecastError};
use crate::domain::{LoadForecastPayload, LoadHistory};

const SERVICE: &str = "load forecast service";

/// Produces a quantile load forecast from measured history
#[async_trait]
pub trait LoadForecastSource: Send + Sync {
    async fn forecast(&self, history: &LoadHistory) -> Result<LoadForecastPayload, ForecastError>;
}

/// Client for the load-forecast service (`POST {base_url}/forecast`)
#[derive(Clone)]
pub struct HttpLoadForecaster {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLoadForecaster {
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

    fn url(&self) -> String {
        format!("{}/forecast", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LoadForecastSource for HttpLoadForecaster {
    async fn forecast(&self, history: &LoadHistory) -> Result<LoadForecastPayload, ForecastError> {
        let url = self.url();
        debug!(
            %url,
            samples = history.power.len(),
            signals = history.signals.len(),
            "requesting load forecast"
        );

        let resp = self
            .client
            .post(&url)
            .json(history)
            .send()
            .await
            .map_err(|source| ForecastError::Transport {
                service: SERVICE,
                source,
            })?;

        let payload: LoadForecastPayload = decode_response(SERVICE, resp).await?;
        info!(
            quantiles = payload.quantiles.as_ref().map_or(0, |q| q.len()),
            "received load forecast"
        );
        Ok(payload)
    }
}
