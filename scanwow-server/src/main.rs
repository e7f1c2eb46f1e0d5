//! ScanWow Server - receives scanned pages from the ScanWow mobile app
//!
//! - POST /api/scans - connectivity ping or multipart scan upload
//! - GET /health - Health check
//! - GET /ready - Readiness probe
//! - GET /api-docs/openapi.json - OpenAPI document

use std::net::SocketAddr;

use anyhow::Context;
use scanwow_server::{create_router, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    if config.auth_token.is_none() {
        tracing::error!("SCANWOW_TOKEN is not set: every scan request will be rejected with 500");
    }

    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("Failed to prepare storage at {}", config.upload_dir.display()))?;

    tracing::info!(
        storage = state.sink.kind(),
        upload_dir = %config.upload_dir.display(),
        max_file_size_mb = config.max_file_size_mb,
        "Storage ready"
    );

    let app = create_router(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("ScanWow server v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    tracing::info!("  POST /api/scans             - Ping (JSON) or scan upload (multipart)");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  GET  /ready                 - Readiness probe");
    tracing::info!("  GET  /api-docs/openapi.json - OpenAPI document");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
