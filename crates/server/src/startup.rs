use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::{AppConfig, ImportConfig};
use service::city::{
    repo::seaorm::{SeaOrmCityRepository, SeaOrmStateRepository},
    source::IbgeClient,
    CityService,
};

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config.toml when present, otherwise build the config from env vars.
/// A file that exists but fails to parse or validate stops startup.
fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load_or_env()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire repositories, the city service and the municipality client into handler state.
pub fn build_state(db: sea_orm::DatabaseConnection, import: &ImportConfig) -> anyhow::Result<AppState> {
    let cities = Arc::new(SeaOrmCityRepository { db: db.clone() });
    let states = Arc::new(SeaOrmStateRepository { db });
    let client = IbgeClient::new(import.municipalities_url.clone(), Duration::from_secs(import.timeout_secs))?;
    info!(url = %client.url(), "municipality source configured");
    Ok(AppState {
        cities: Arc::new(CityService::new(cities, states)),
        municipalities: Arc::new(client),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    let cfg = load_config()?;
    let db = models::db::connect_with_config(&cfg.database).await?;

    let state = build_state(db, &cfg.import)?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
