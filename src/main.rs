mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod errors;

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::api_routes::build_router;
use crate::shared_state::AppState;

/// Overrides the config file location.
const CONFIG_PATH_ENV: &str = "SOLAR_CONFIG";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // 1. Load configuration
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.json".to_string());
    let config = Config::load(&path)?;
    info!(
        path = %path,
        cities = config.climate_table().len(),
        weather_configured = !config.weather.api_key.is_empty(),
        "configuration loaded"
    );

    // 2. Initialize shared state
    let port = config.server.port;
    let state = AppState::new(config).context("failed to build weather client")?;
    if !state.weather.is_configured() {
        info!("no weather API key; live weather endpoints will return 503");
    }

    // 3. Start Axum HTTP server
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "API server listening");
    info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server failed")?;
    Ok(())
}
