//! ScanWow Server Library - HTTP receiver for the ScanWow scanning app
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

pub use auth::BearerAuth;
pub use config::{Config, StorageBackend};
pub use error::ApiError;
pub use handlers::{ScanRequest, ScanResponse};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
