use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    store: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /healthz - Liveness probe
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /health - Reports whether the store can be read
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, store) = match state.store.pv_site_config().await {
        Ok(_) => (
            StatusCode::OK,
            ComponentHealth {
                status: "healthy",
                error: None,
            },
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ComponentHealth {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        ),
    };

    let overall = if status == StatusCode::OK {
        "healthy"
    } else {
        "unhealthy"
    };

    (
        status,
        Json(HealthResponse {
            status: overall,
            timestamp: chrono::Utc::now(),
            store,
        }),
    )
}
