//! Scan upload handler
//!
//! Handles POST /api/scans. The endpoint is dual-purpose: a JSON request is a
//! connectivity probe from the scanning app, anything else is attempted as a
//! multipart upload of scanned pages.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use scanwow_core::{classify, IngestError, RequestKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::BearerAuth;
use crate::error::ApiError;
use crate::multipart::ingest;
use crate::state::AppState;

pub const PING_MESSAGE: &str = "Connection successful!";
pub const RECEIVED_MESSAGE: &str = "Scan received successfully";

/// Success body shared by both branches
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ScanResponse {
    /// Always true on success
    #[schema(example = true)]
    pub success: bool,
    /// Human-readable outcome
    #[schema(example = "Scan received successfully")]
    pub message: String,
}

impl ScanResponse {
    fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// An authenticated request to `POST /api/scans`, classified by Content-Type.
pub enum ScanRequest {
    /// `application/json` connectivity probe. The body is never read.
    Ping,
    /// Everything else, decoded as multipart.
    Ingestion(Multipart),
}

impl FromRequest<AppState> for ScanRequest {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let kind = classify(
            req.headers()
                .get(header::CONTENT_TYPE)
                .map(|value| value.as_bytes()),
        );

        match kind {
            RequestKind::Ping => Ok(ScanRequest::Ping),
            RequestKind::Ingestion => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|rejection| IngestError::malformed(rejection.body_text()))?;
                Ok(ScanRequest::Ingestion(multipart))
            }
        }
    }
}

/// Answer a connectivity probe. Touches nothing.
pub fn handle_ping() -> ScanResponse {
    tracing::info!("Received test ping");
    ScanResponse::new(PING_MESSAGE)
}

/// Receive a scan or answer a connectivity probe
///
/// Requires `Authorization: Bearer <token>`.
///
/// - **Content-Type `application/json`**: connectivity probe, body ignored.
/// - **Content-Type `multipart/form-data`**: any number of file parts (any
///   field name), an optional `metadata` text field holding JSON
///   (`title`, `scanId`, `pageCount`) and an optional `ocrText` text field.
///
/// Malformed `metadata` JSON does not fail the request.
#[utoipa::path(
    post,
    path = "/api/scans",
    tag = "Scans",
    request_body(
        content_type = "multipart/form-data",
        description = "Scanned page files plus optional `metadata` (JSON string) and `ocrText` fields"
    ),
    responses(
        (status = 200, description = "Ping answered or scan received", body = ScanResponse),
        (status = 400, description = "Malformed multipart body, file too large, or storage failure"),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Invalid token"),
        (status = 500, description = "Server has no token configured")
    ),
    security(("bearer_auth" = []))
)]
pub async fn receive_scan(
    State(state): State<AppState>,
    _auth: BearerAuth,
    request: ScanRequest,
) -> Result<Json<ScanResponse>, ApiError> {
    match request {
        ScanRequest::Ping => Ok(Json(handle_ping())),
        ScanRequest::Ingestion(mut multipart) => {
            let summary = ingest(&mut multipart, &state).await?;
            summary.log();
            Ok(Json(ScanResponse::new(RECEIVED_MESSAGE)))
        }
    }
}
