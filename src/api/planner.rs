use axum::{
    extract::{Path, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    domain::{LoadForecastPayload, LoadHistory, PvSiteConfig, Summary, SurplusWindow},
    pipeline::{load::parse_millis_key, ChartData},
    state::AppState,
};

/// Uploaded history plus optional dynamic prices for flex pricing
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// Price per interval keyed by epoch-millisecond timestamp
    #[serde(default)]
    pub total_price: BTreeMap<String, f64>,
    /// `power` and every other signal of the upload
    #[serde(flatten)]
    pub history: LoadHistory,
}

impl PredictRequest {
    fn into_parts(self) -> Result<(LoadHistory, BTreeMap<i64, f64>), ApiError> {
        let mut total_price = BTreeMap::new();
        for (key, price) in self.total_price {
            total_price.insert(parse_millis_key(&key, "price table")?.millis(), price);
        }
        Ok((self.history, total_price))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub surplus_windows: Vec<SurplusWindow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /efp/predict - Plan from an uploaded load history
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<ApiResponse<PredictionResponse>>, ApiError> {
    let started = Instant::now();
    let (history, total_price) = request.into_parts()?;

    let report = state.engine.predict(&history, &total_price).await?;

    Ok(Json(
        ApiResponse::success(PredictionResponse {
            summary: report.summary,
            surplus_windows: report.windows,
        })
        .with_duration(started.elapsed().as_millis() as u64),
    ))
}

async fn save_site(
    state: &AppState,
    site: PvSiteConfig,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    site.validate()?;
    state.store.save_pv_site_config(&site).await?;
    info!(
        latitude = site.latitude,
        longitude = site.longitude,
        kwp = site.kwp,
        "saved PV configuration"
    );
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "PV configuration saved successfully!".to_string(),
    })))
}

/// POST /efp/pv-config/:lat/:lon/:dec/:az/:kwp - Save the PV site
pub async fn set_pv_config(
    State(state): State<AppState>,
    Path((latitude, longitude, declination, azimuth, kwp)): Path<(f64, f64, f64, f64, f64)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    save_site(
        &state,
        PvSiteConfig {
            latitude,
            longitude,
            declination,
            azimuth,
            kwp,
        },
    )
    .await
}

/// POST /pv-config - Save the PV site from a submitted form
pub async fn submit_pv_config(
    State(state): State<AppState>,
    Form(site): Form<PvSiteConfig>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    save_site(&state, site).await
}

/// GET /efp/pv-config - Current PV site
pub async fn get_pv_config(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PvSiteConfig>>, ApiError> {
    let site = state
        .store
        .pv_site_config()
        .await?
        .ok_or_else(|| ApiError::NotFound("PV configuration not found".to_string()))?;
    Ok(Json(ApiResponse::success(site)))
}

/// GET /efp/load-forecast - Load forecast stored by the most recent prediction
pub async fn get_load_forecast(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LoadForecastPayload>>, ApiError> {
    let forecast = state
        .store
        .load_forecast()
        .await?
        .ok_or_else(|| ApiError::NotFound("no load forecast has been stored yet".to_string()))?;
    Ok(Json(ApiResponse::success(forecast)))
}

/// GET /efp/display - Chart data of the most recent plan
pub async fn display(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartData>>, ApiError> {
    let report = state
        .store
        .last_report()
        .await?
        .ok_or_else(|| ApiError::NotFound("no prediction has been made yet".to_string()))?;
    Ok(Json(ApiResponse::success(report.chart())))
}
