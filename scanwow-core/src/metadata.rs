//! Scan metadata carried in the `metadata` multipart field.
//!
//! The field is a JSON-encoded string. Parsing is deliberately loose: unknown
//! keys are ignored, recognized keys may have any JSON type, and a body that
//! is valid JSON but not an object yields empty metadata. Only invalid JSON is
//! an error, and callers recover from that with [`ScanMetadata::default`].

use serde::Serialize;
use serde_json::Value;

use crate::error::MetadataParseError;

/// Title used when the client did not send one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Loosely-typed scan metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    pub title: Option<String>,
    /// Opaque client identifier, logged as-is.
    pub scan_id: Option<Value>,
    pub page_count: Option<Value>,
}

impl ScanMetadata {
    /// Parse the raw `metadata` field.
    pub fn parse(raw: &str) -> Result<Self, MetadataParseError> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(value))
    }

    /// Parse, degrading to empty metadata on invalid JSON.
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to parse metadata JSON");
            Self::default()
        })
    }

    fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        Self {
            title: map.remove("title").and_then(title_text),
            scan_id: map.remove("scanId").filter(|v| !v.is_null()),
            page_count: map.remove("pageCount").filter(|v| !v.is_null()),
        }
    }

    /// The title to report, falling back to [`DEFAULT_TITLE`].
    pub fn title_or_default(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_TITLE,
        }
    }
}

fn title_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_metadata() {
        let meta =
            ScanMetadata::parse(r#"{"title":"Invoice","scanId":"abc","pageCount":1}"#).unwrap();
        assert_eq!(meta.title_or_default(), "Invoice");
        assert_eq!(meta.scan_id, Some(json!("abc")));
        assert_eq!(meta.page_count, Some(json!(1)));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let meta = ScanMetadata::parse(r#"{"title":"A","colour":"blue","pages":[1,2]}"#).unwrap();
        assert_eq!(meta.title.as_deref(), Some("A"));
        assert!(meta.scan_id.is_none());
        assert!(meta.page_count.is_none());
    }

    #[test]
    fn test_missing_title_defaults() {
        let meta = ScanMetadata::parse(r#"{"scanId":42}"#).unwrap();
        assert_eq!(meta.title_or_default(), DEFAULT_TITLE);
        assert_eq!(meta.scan_id, Some(json!(42)));
    }

    #[test]
    fn test_empty_title_defaults() {
        let meta = ScanMetadata::parse(r#"{"title":""}"#).unwrap();
        assert_eq!(meta.title_or_default(), DEFAULT_TITLE);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(ScanMetadata::parse("{not valid").is_err());
        assert!(ScanMetadata::parse("").is_err());
    }

    #[test]
    fn test_invalid_json_degrades_to_default() {
        let meta = ScanMetadata::parse_or_default("{not valid");
        assert_eq!(meta, ScanMetadata::default());
        assert_eq!(meta.title_or_default(), "Untitled");
    }

    #[test]
    fn test_non_object_json_is_empty() {
        assert_eq!(ScanMetadata::parse("[1,2]").unwrap(), ScanMetadata::default());
        assert_eq!(ScanMetadata::parse("\"hi\"").unwrap(), ScanMetadata::default());
        assert_eq!(ScanMetadata::parse("null").unwrap(), ScanMetadata::default());
    }

    #[test]
    fn test_loose_types_survive() {
        let meta = ScanMetadata::parse(r#"{"title":7,"pageCount":"3","scanId":null}"#).unwrap();
        assert_eq!(meta.title.as_deref(), Some("7"));
        assert_eq!(meta.page_count, Some(json!("3")));
        assert!(meta.scan_id.is_none());
    }
}
