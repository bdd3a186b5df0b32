//! HTTP surface exercised in-process against fake forecast services

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use common::*;
use energy_forecast_planner::{
    api,
    config::Config,
    repo::{ForecastStore, MemoryStore},
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(load: FakeLoadSource, pv: FakePvSource, store: Arc<MemoryStore>) -> Router {
    let cfg = Config::default();
    let state = AppState::with_parts(Arc::new(load), Arc::new(pv), store, &cfg);
    api::router(state, &cfg)
}

fn healthy_app(store: Arc<MemoryStore>) -> Router {
    app(
        FakeLoadSource::ok(load_forecast(1000.0)),
        FakePvSource::ok(pv_forecast(500.0)),
        store,
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn predict_request(days: i64) -> Request<Body> {
    let body = json!({ "power": history(days).power });
    Request::post("/efp/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let (status, _) = send(
        healthy_app(Arc::new(MemoryStore::new())),
        Request::get("/healthz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_store() {
    let (status, body) = send(
        healthy_app(Arc::new(MemoryStore::new())),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"]["status"], "healthy");
}

#[tokio::test]
async fn test_predict_returns_summary_and_windows() {
    let store = Arc::new(MemoryStore::with_pv_site_config(site()));
    let (status, body) = send(healthy_app(store.clone()), predict_request(8)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert!((data["total_power_kwh"].as_f64().unwrap() - 24.0).abs() < 1e-9);
    assert!((data["total_solar_kwh"].as_f64().unwrap() - 2.5).abs() < 1e-9);
    assert_eq!(data["surplus_times"], json!([]));
    assert_eq!(data["surplus_windows"], json!([]));
    assert!(store.last_report().await.unwrap().is_some());
}

#[tokio::test]
async fn test_predict_with_short_history_is_bad_request() {
    let store = Arc::new(MemoryStore::with_pv_site_config(site()));
    let (status, body) = send(healthy_app(store), predict_request(3)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
    assert!(body["message"].as_str().unwrap().contains("3"));
}

#[tokio::test]
async fn test_predict_without_pv_config_is_bad_request() {
    let (status, body) = send(healthy_app(Arc::new(MemoryStore::new())), predict_request(8)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("PV configuration not found"));
}

#[tokio::test]
async fn test_predict_with_pv_outage_and_no_cache_is_unavailable() {
    let store = Arc::new(MemoryStore::with_pv_site_config(site()));
    let router = app(
        FakeLoadSource::ok(load_forecast(1000.0)),
        FakePvSource::failing(),
        store,
    );
    let (status, body) = send(router, predict_request(8)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "ServiceUnavailable");
}

#[tokio::test]
async fn test_pv_config_round_trip_via_path() {
    let store = Arc::new(MemoryStore::new());

    let (status, body) = send(
        healthy_app(store.clone()),
        Request::post("/efp/pv-config/52.52/13.4/30/0/5.5")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "PV configuration saved successfully!");

    let (status, body) = send(
        healthy_app(store),
        Request::get("/efp/pv-config").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kwp"], 5.5);
    assert_eq!(body["data"]["declination"], 30.0);
}

#[tokio::test]
async fn test_pv_config_form_submission() {
    let store = Arc::new(MemoryStore::new());
    let (status, _) = send(
        healthy_app(store.clone()),
        Request::post("/pv-config")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "latitude=48.1&longitude=11.6&declination=35&azimuth=-10&kwp=7.2",
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let saved = store.pv_site_config().await.unwrap().unwrap();
    assert_eq!(saved.azimuth, -10.0);
    assert_eq!(saved.kwp, 7.2);
}

#[tokio::test]
async fn test_pv_config_out_of_range_rejected() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = send(
        healthy_app(store.clone()),
        Request::post("/efp/pv-config/95/13.4/30/0/5")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
    assert!(store.pv_site_config().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_pv_config_is_not_found() {
    let (status, _) = send(
        healthy_app(Arc::new(MemoryStore::new())),
        Request::get("/efp/pv-config").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_display_before_and_after_prediction() {
    let store = Arc::new(MemoryStore::with_pv_site_config(site()));

    let (status, _) = send(
        healthy_app(store.clone()),
        Request::get("/efp/display").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(healthy_app(store.clone()), predict_request(8)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        healthy_app(store),
        Request::get("/efp/display").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["intervals"].as_array().unwrap().len(), 24);
    assert_eq!(body["data"]["markers"], json!([]));
}

#[tokio::test]
async fn test_stored_load_forecast_served_after_prediction() {
    let store = Arc::new(MemoryStore::with_pv_site_config(site()));

    let (status, _) = send(
        healthy_app(store.clone()),
        Request::get("/efp/load-forecast").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(healthy_app(store.clone()), predict_request(8)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        healthy_app(store),
        Request::get("/efp/load-forecast").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["quantiles"]["power_0.5"].as_object().unwrap().len(),
        24
    );
}
