//! API error handling module
//!
//! Provides a unified error type for all API endpoints. Every failure is
//! rendered as `{"error": "<message>"}`; internal details are logged, never
//! sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scanwow_core::{AuthError, IngestError};
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed or could not be attempted
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Multipart ingestion failed
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(e) => match e {
                AuthError::MissingHeader | AuthError::MalformedHeader => StatusCode::UNAUTHORIZED,
                AuthError::Mismatch => StatusCode::FORBIDDEN,
                // Deployment mistake, not a bad client
                AuthError::SecretUnconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Ingest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code used in logs
    fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(e) => match e {
                AuthError::MissingHeader => "AUTH_MISSING_HEADER",
                AuthError::MalformedHeader => "AUTH_MALFORMED_HEADER",
                AuthError::SecretUnconfigured => "AUTH_SECRET_UNCONFIGURED",
                AuthError::Mismatch => "AUTH_INVALID_TOKEN",
            },
            Self::Ingest(e) => match e {
                IngestError::SizeLimitExceeded { .. } => "FILE_TOO_LARGE",
                IngestError::MalformedMultipart(_) => "MALFORMED_MULTIPART",
                IngestError::WriteFailure(_) => "WRITE_FAILURE",
            },
        }
    }

    /// Get sanitized error message for client response
    pub fn client_message(&self) -> String {
        match self {
            Self::Auth(e) => match e {
                AuthError::SecretUnconfigured => "Server configuration error".to_string(),
                other => other.to_string(),
            },
            Self::Ingest(e) => match e {
                IngestError::SizeLimitExceeded { limit } => {
                    format!("File too large: exceeds maximum of {}", human_size(*limit))
                }
                IngestError::MalformedMultipart(message) => message.clone(),
                // Never expose storage paths or OS error text
                IngestError::WriteFailure(_) => "Failed to store uploaded file".to_string(),
            },
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Ingest(_) => "ingest",
        }
    }
}

/// `50 MB` for whole mebibytes, otherwise a byte count.
fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        match &self {
            Self::Auth(AuthError::SecretUnconfigured) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    "SCANWOW_TOKEN is not configured; rejecting request"
                );
            }
            Self::Auth(_) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Authentication error"
                );
            }
            Self::Ingest(IngestError::WriteFailure(_)) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Upload error"
                );
            }
            Self::Ingest(_) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Client error"
                );
            }
        }

        let body = serde_json::json!({
            "error": client_message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwow_core::StorageError;

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::MissingHeader).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::MalformedHeader).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Mismatch).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(AuthError::SecretUnconfigured).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_client_messages() {
        assert_eq!(
            ApiError::from(AuthError::MissingHeader).client_message(),
            "Missing authorization header"
        );
        assert_eq!(
            ApiError::from(AuthError::MalformedHeader).client_message(),
            "Invalid authorization header format"
        );
        assert_eq!(
            ApiError::from(AuthError::Mismatch).client_message(),
            "Invalid token"
        );
        assert_eq!(
            ApiError::from(AuthError::SecretUnconfigured).client_message(),
            "Server configuration error"
        );
    }

    #[test]
    fn test_ingest_errors_are_bad_request() {
        let too_large = ApiError::from(IngestError::SizeLimitExceeded {
            limit: 50 * 1024 * 1024,
        });
        assert_eq!(too_large.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            too_large.client_message(),
            "File too large: exceeds maximum of 50 MB"
        );

        let small = ApiError::from(IngestError::SizeLimitExceeded { limit: 16 });
        assert_eq!(
            small.client_message(),
            "File too large: exceeds maximum of 16 bytes"
        );

        let malformed = ApiError::from(IngestError::malformed("Failed to parse multipart"));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_write_failure_hides_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/srv/uploads/x");
        let err = ApiError::from(IngestError::WriteFailure(StorageError::Io(io)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.client_message().contains("/srv"));
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = ApiError::from(AuthError::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid token" }));
    }
}
