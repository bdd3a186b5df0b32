pub mod error;
pub mod health;
pub mod planner;
pub mod response;

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, state::AppState};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/health", get(health::health_check))
        .route("/efp/predict", post(planner::predict))
        .route("/efp/display", get(planner::display))
        .route("/efp/pv-config", get(planner::get_pv_config))
        .route("/efp/load-forecast", get(planner::get_load_forecast))
        .route(
            "/efp/pv-config/:lat/:lon/:dec/:az/:kwp",
            post(planner::set_pv_config),
        )
        .route("/pv-config", post(planner::submit_pv_config))
        .with_state(state);

    if cfg.server.enable_cors {
        use axum::http::{header, Method};
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(cfg.server.max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}
