use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{donors::DonorService, file::donor_table::DonorTable};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// The front-end is served from another origin, so CORS is wide open.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the donor table and build the router for the given configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    common::env::ensure_env(&cfg.server.frontend_dir, &cfg.storage.data_dir).await?;

    let table = DonorTable::open(cfg.storage.donors_table_path()).await?;
    info!(path = %table.path().display(), "donor table ready");

    let state = ServerState::new(DonorService::new(table));
    Ok(routes::build_router(state, build_cors(), &cfg.server.frontend_dir))
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "donor registry listening");
    axum::serve(listener, app).await?;
    Ok(())
}
