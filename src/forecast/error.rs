use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to one of the external forecast services
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{service} response could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ForecastError {
    pub fn service(&self) -> &'static str {
        match self {
            ForecastError::Transport { service, .. }
            | ForecastError::Status { service, .. }
            | ForecastError::Decode { service, .. } => service,
        }
    }
}

/// Read a response body and decode it, mapping every failure to the service
pub(crate) async fn decode_response<T: serde::de::DeserializeOwned>(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<T, ForecastError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|source| ForecastError::Transport { service, source })?;
    if !status.is_success() {
        return Err(ForecastError::Status {
            service,
            status,
            body,
        });
    }
    serde_json::from_str(&body).map_err(|source| ForecastError::Decode { service, source })
}
