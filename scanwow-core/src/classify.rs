//! Content-type dispatch for `POST /api/scans`.

/// Marker that turns a request into a connectivity probe.
const PING_MARKER: &[u8] = b"application/json";

/// What an inbound scan request is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// JSON "is this endpoint alive" probe. Never touches storage.
    Ping,
    /// Anything else is attempted as a multipart upload.
    Ingestion,
}

/// Classify by raw `Content-Type` header bytes.
///
/// Case-sensitive substring match on `application/json`; a missing header
/// falls through to ingestion.
pub fn classify(content_type: Option<&[u8]>) -> RequestKind {
    match content_type {
        Some(value) if contains(value, PING_MARKER) => RequestKind::Ping,
        _ => RequestKind::Ingestion,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
