//! Application state module
//!
//! Defines shared state accessible across all request handlers. Everything
//! here is built once at startup and is read-only afterwards.

use std::sync::Arc;

use scanwow_core::{Credential, FileNamer, FilesystemSink, MemorySink, StorageResult, StorageSink};

use crate::config::{Config, StorageBackend};

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Bearer secret; `None` makes every scan request fail with 500
    pub credential: Option<Arc<Credential>>,
    /// Destination for uploaded files
    pub sink: Arc<dyn StorageSink>,
    /// Stored-name generator shared by all requests
    pub namer: Arc<FileNamer>,
    /// Per-file upload limit in bytes
    pub max_file_size: usize,
}

impl AppState {
    /// Build state around an existing sink.
    pub fn new(config: &Config, sink: Arc<dyn StorageSink>) -> Self {
        Self {
            credential: config.auth_token.clone().map(Arc::new),
            sink,
            namer: Arc::new(FileNamer::new()),
            max_file_size: config.max_file_size_bytes(),
        }
    }

    /// Build state with the sink selected by configuration.
    ///
    /// Creates the upload directory for the filesystem backend.
    pub async fn from_config(config: &Config) -> StorageResult<Self> {
        let sink: Arc<dyn StorageSink> = match config.storage_backend {
            StorageBackend::Filesystem => Arc::new(FilesystemSink::new(&config.upload_dir).await?),
            StorageBackend::Memory => Arc::new(MemorySink::new()),
        };
        Ok(Self::new(config, sink))
    }

    /// Override the per-file limit (bytes).
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }
}
