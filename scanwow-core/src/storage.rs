//! Storage sinks for uploaded scan pages.
//!
//! A sink is a flat, append-only namespace: bytes go in under a name chosen
//! by [`crate::FileNamer`] and are never rewritten. Removal exists only so a
//! failed request can clean up what it already wrote.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::error::{StorageError, StorageResult};

/// A file persisted by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub name: String,
    pub size_bytes: u64,
}

impl StoredFile {
    /// Size in KiB, for log lines.
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Destination for uploaded file parts.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Persist `bytes` under `name`. Must not overwrite an existing entry.
    async fn store(&self, name: &str, bytes: Bytes) -> StorageResult<StoredFile>;

    /// Delete a previously stored entry.
    async fn remove(&self, name: &str) -> StorageResult<()>;

    /// Short backend label for health output and logs.
    fn kind(&self) -> &'static str;
}

/// Sink writing into a single flat directory.
#[derive(Debug, Clone)]
pub struct FilesystemSink {
    root: PathBuf,
}

impl FilesystemSink {
    /// Create the sink, creating `root` if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` inside the root. Only single plain components are accepted.
    fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(StorageError::InvalidName(name.to_string())),
        }
    }
}

#[async_trait]
impl StorageSink for FilesystemSink {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn store(&self, name: &str, bytes: Bytes) -> StorageResult<StoredFile> {
        let path = self.path_for(name)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
                _ => StorageError::Io(e),
            })?;

        file.write_all(&bytes).await?;
        file.flush().await?;
        file.sync_all().await?;

        Ok(StoredFile {
            name: name.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }

    async fn remove(&self, name: &str) -> StorageResult<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io(e),
        })
    }

    fn kind(&self) -> &'static str {
        "filesystem"
    }
}

/// In-memory sink. Contents live as long as the sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: DashMap<String, Bytes>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Bytes> {
        self.files.get(name).map(|entry| entry.value().clone())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl StorageSink for MemorySink {
    async fn store(&self, name: &str, bytes: Bytes) -> StorageResult<StoredFile> {
        use dashmap::mapref::entry::Entry;

        let size_bytes = bytes.len() as u64;
        match self.files.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(bytes);
                Ok(StoredFile {
                    name: name.to_string(),
                    size_bytes,
                })
            }
        }
    }

    async fn remove(&self, name: &str) -> StorageResult<()> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
