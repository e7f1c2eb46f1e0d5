//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    pub status: String,
    /// Server version from Cargo.toml
    pub version: String,
    /// Service name
    pub service: String,
    /// Storage backend in use
    pub storage: String,
    /// Whether a bearer token is configured
    pub auth_configured: bool,
}

/// GET /health - Health check endpoint
///
/// Reports "degraded" when no token is configured, since every scan request
/// will then be answered with a 500.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let auth_configured = state.credential.is_some();

    let status = if auth_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "scanwow-server".to_string(),
        storage: state.sink.kind().to_string(),
        auth_configured,
    })
}

/// Readiness response for Kubernetes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service is ready to accept traffic
    pub ready: bool,
}

/// GET /ready - Kubernetes readiness probe
///
/// Returns 200 once the server is listening. Unlike /health, this is a simple yes/no check.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses((status = 200, description = "Service is ready", body = ReadyResponse))
)]
pub async fn ready() -> Json<ReadyResponse> {
    Json(ReadyResponse { ready: true })
}
