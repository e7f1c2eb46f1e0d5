//! Bearer token authentication extractor
//!
//! `BearerAuth` runs before any body extractor, so a rejected request never
//! has its upload read.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use scanwow_core::verify;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carried the configured bearer token.
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .map(|value| value.as_bytes());

        verify(header, state.credential.as_deref()).into_result()?;
        Ok(BearerAuth)
    }
}
