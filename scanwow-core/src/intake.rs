//! Per-request accumulation of an ingestion.
//!
//! The transport layer decodes a multipart body and feeds each part into a
//! [`ScanIntake`]. File parts are named and written to the sink as they
//! arrive; text fields are remembered. [`ScanIntake::finish`] turns the result
//! into a [`ScanSummary`], and [`ScanIntake::abandon`] removes whatever this
//! request stored when the upload fails part way.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::IngestError;
use crate::metadata::ScanMetadata;
use crate::naming::FileNamer;
use crate::storage::{StorageSink, StoredFile};

/// Form field holding the JSON metadata.
pub const METADATA_FIELD: &str = "metadata";
/// Form field holding raw OCR text.
pub const OCR_TEXT_FIELD: &str = "ocrText";

/// Aggregated result of one ingestion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub title: String,
    pub scan_id: Option<Value>,
    pub page_count: Option<Value>,
    pub file_count: usize,
    pub stored_files: Vec<StoredFile>,
    /// OCR text length in characters, when the field was sent.
    pub ocr_text_length: Option<usize>,
}

impl ScanSummary {
    pub fn total_bytes(&self) -> u64 {
        self.stored_files.iter().map(|f| f.size_bytes).sum()
    }

    /// Emit the "scan received" log record.
    pub fn log(&self) {
        let scan_id = self.scan_id.as_ref().map(display_value);
        let page_count = self.page_count.as_ref().map(display_value);

        tracing::info!(
            title = %self.title,
            scan_id = scan_id.as_deref().unwrap_or("none"),
            page_count = page_count.as_deref().unwrap_or("none"),
            files = self.file_count,
            total_bytes = self.total_bytes(),
            ocr_text_length = ?self.ocr_text_length,
            "Scan received"
        );

        for file in &self.stored_files {
            tracing::info!(
                file = %file.name,
                size_kib = %format!("{:.1}", file.size_kib()),
                "Saved scan page"
            );
        }
    }
}

/// Strings without their JSON quotes, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accumulator for one ingestion request.
pub struct ScanIntake<'a> {
    sink: &'a dyn StorageSink,
    namer: &'a FileNamer,
    stored: Vec<StoredFile>,
    metadata: Option<String>,
    ocr_text: Option<String>,
}

impl<'a> ScanIntake<'a> {
    pub fn new(sink: &'a dyn StorageSink, namer: &'a FileNamer) -> Self {
        Self {
            sink,
            namer,
            stored: Vec::new(),
            metadata: None,
            ocr_text: None,
        }
    }

    /// Name and persist one file part.
    pub async fn accept_file(
        &mut self,
        original_name: Option<&str>,
        bytes: Bytes,
    ) -> Result<&StoredFile, IngestError> {
        let original_name = original_name.filter(|n| !n.is_empty());
        let name = self.namer.stored_name(original_name);
        let stored = self.sink.store(&name, bytes).await?;

        tracing::debug!(file = %stored.name, size = stored.size_bytes, "Stored file part");
        self.stored.push(stored);
        Ok(&self.stored[self.stored.len() - 1])
    }

    /// Remember a text field. Later occurrences replace earlier ones.
    pub fn accept_field(&mut self, name: &str, value: String) {
        match name {
            METADATA_FIELD => self.metadata = Some(value),
            OCR_TEXT_FIELD => self.ocr_text = Some(value),
            other => tracing::debug!(field = other, "Ignoring unrecognized form field"),
        }
    }

    /// Build the summary. Invalid metadata JSON yields empty metadata.
    pub fn finish(self) -> ScanSummary {
        let metadata = self
            .metadata
            .as_deref()
            .map(ScanMetadata::parse_or_default)
            .unwrap_or_default();

        ScanSummary {
            title: metadata.title_or_default().to_string(),
            scan_id: metadata.scan_id,
            page_count: metadata.page_count,
            file_count: self.stored.len(),
            stored_files: self.stored,
            ocr_text_length: self
                .ocr_text
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(|text| text.chars().count()),
        }
    }

    /// Best-effort removal of every file this request stored.
    pub async fn abandon(self) {
        for file in &self.stored {
            if let Err(e) = self.sink.remove(&file.name).await {
                tracing::warn!(file = %file.name, error = %e, "Failed to clean up partial upload");
            }
        }
        if !self.stored.is_empty() {
            tracing::info!(removed = self.stored.len(), "Cleaned up partial upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::split_stored_name;
    use crate::storage::MemorySink;
    use serde_json::json;

    #[tokio::test]
    async fn test_full_intake() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);

        intake
            .accept_file(Some("scan1.png"), Bytes::from_static(b"0123456789"))
            .await
            .unwrap();
        intake.accept_field(
            METADATA_FIELD,
            r#"{"title":"Invoice","scanId":"abc","pageCount":1}"#.to_string(),
        );
        intake.accept_field(OCR_TEXT_FIELD, "héllo".to_string());

        let summary = intake.finish();
        assert_eq!(summary.title, "Invoice");
        assert_eq!(summary.scan_id, Some(json!("abc")));
        assert_eq!(summary.page_count, Some(json!(1)));
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.ocr_text_length, Some(5));
        assert_eq!(summary.total_bytes(), 10);

        let stored = &summary.stored_files[0];
        let (_, original) = split_stored_name(&stored.name).unwrap();
        assert_eq!(original, "scan1.png");
        assert_eq!(sink.get(&stored.name).unwrap(), Bytes::from_static(b"0123456789"));
    }

    #[tokio::test]
    async fn test_malformed_metadata_is_recovered() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);
        intake.accept_field(METADATA_FIELD, "{not valid".to_string());

        let summary = intake.finish();
        assert_eq!(summary.title, "Untitled");
        assert!(summary.scan_id.is_none());
        assert_eq!(summary.file_count, 0);
    }

    #[tokio::test]
    async fn test_no_fields() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let summary = ScanIntake::new(&sink, &namer).finish();
        assert_eq!(summary.title, "Untitled");
        assert!(summary.ocr_text_length.is_none());
        assert!(summary.stored_files.is_empty());
    }

    #[tokio::test]
    async fn test_same_original_name_twice() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);

        intake.accept_file(Some("page.png"), Bytes::from_static(b"a")).await.unwrap();
        intake.accept_file(Some("page.png"), Bytes::from_static(b"b")).await.unwrap();

        let summary = intake.finish();
        assert_eq!(summary.file_count, 2);
        assert_ne!(summary.stored_files[0].name, summary.stored_files[1].name);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_filename_uses_fallback() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);

        let stored = intake.accept_file(Some(""), Bytes::new()).await.unwrap();
        assert!(stored.name.ends_with("-upload.bin"));
        assert_eq!(stored.size_bytes, 0);
    }

    #[tokio::test]
    async fn test_last_field_wins_and_unknown_ignored() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);

        intake.accept_field(METADATA_FIELD, r#"{"title":"first"}"#.to_string());
        intake.accept_field(METADATA_FIELD, r#"{"title":"second"}"#.to_string());
        intake.accept_field("notes", "ignored".to_string());

        assert_eq!(intake.finish().title, "second");
    }

    #[tokio::test]
    async fn test_abandon_removes_stored_files() {
        let sink = MemorySink::new();
        let namer = FileNamer::new();
        let mut intake = ScanIntake::new(&sink, &namer);

        intake.accept_file(Some("a.png"), Bytes::from_static(b"a")).await.unwrap();
        intake.accept_file(Some("b.png"), Bytes::from_static(b"b")).await.unwrap();
        assert_eq!(sink.len(), 2);

        intake.abandon().await;
        assert!(sink.is_empty());
    }
}
