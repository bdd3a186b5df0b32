use anyhow::Result;
use energy_forecast_planner::{api, config, state, telemetry};
use config::Config;
use state::AppState;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let app_state = AppState::new(&cfg)?;
    let app = api::router(app_state, &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be accessible from the network");
    }

    info!(
        %addr,
        load_forecast = %cfg.load_forecast.base_url,
        pv_forecast = %cfg.pv_forecast.base_url,
        "starting Energy Forecast Planner"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
