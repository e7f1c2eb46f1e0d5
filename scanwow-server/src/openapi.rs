//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3 document served at `/api-docs/openapi.json`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{HealthResponse, ReadyResponse, ScanResponse};

/// Registers the shared bearer token scheme referenced by `POST /api/scans`.
struct BearerSecurityAddon;

impl Modify for BearerSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Shared secret configured on the server via `SCANWOW_TOKEN`:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// ScanWow Receiver API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ScanWow Receiver API",
        version = "0.1.0",
        description = r#"
## Scan ingestion endpoint for the ScanWow mobile app

The app pushes scanned pages to a single endpoint, `POST /api/scans`:

1. Send `Content-Type: application/json` to test connectivity. Nothing is stored.
2. Send `multipart/form-data` with one or more page files, an optional
   `metadata` field (JSON: `title`, `scanId`, `pageCount`) and an optional
   `ocrText` field to upload a scan.

Every request to `/api/scans` must carry `Authorization: Bearer <token>`.
Stored file names are sanitized and prefixed with a unique token, so
uploads never overwrite each other.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Scans", description = "Receive scanned pages and connectivity pings"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::scans::receive_scan,
    ),
    components(schemas(HealthResponse, ReadyResponse, ScanResponse)),
    modifiers(&BearerSecurityAddon)
)]
pub struct ApiDoc;
