//! ScanWow Core - ingestion primitives for the scan receiver
//!
//! This crate holds everything about receiving a scanned document that does
//! not depend on HTTP:
//!
//! - Bearer token verification with constant-time comparison
//! - Content-type classification (ping probe vs. multipart upload)
//! - Loose parsing of the JSON `metadata` field
//! - Filename sanitization and collision-free stored names
//! - Storage sinks (flat directory, in-memory)
//! - Per-request intake that produces a [`ScanSummary`]
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use scanwow_core::{FileNamer, FilesystemSink, ScanIntake};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = FilesystemSink::new("uploads").await?;
//! let namer = FileNamer::new();
//!
//! let mut intake = ScanIntake::new(&sink, &namer);
//! intake.accept_file(Some("page 1.png"), Bytes::from_static(b"...")).await?;
//! intake.accept_field("metadata", r#"{"title":"Invoice"}"#.to_string());
//!
//! let summary = intake.finish();
//! summary.log();
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod classify;
pub mod error;
pub mod intake;
pub mod metadata;
pub mod naming;
pub mod storage;

pub use auth::{verify, Credential, Verdict, BEARER_SCHEME};
pub use classify::{classify, RequestKind};
pub use error::{AuthError, IngestError, MetadataParseError, StorageError, StorageResult};
pub use intake::{ScanIntake, ScanSummary, METADATA_FIELD, OCR_TEXT_FIELD};
pub use metadata::{ScanMetadata, DEFAULT_TITLE};
pub use naming::{sanitize_filename, split_stored_name, FileNamer, FALLBACK_FILE_NAME};
pub use storage::{FilesystemSink, MemorySink, StorageSink, StoredFile};
