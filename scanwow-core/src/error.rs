use thiserror::Error;

/// Reasons a request fails bearer-token authentication.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    MalformedHeader,

    /// The server has no secret to compare against. A deployment fault, not a client fault.
    #[error("No bearer secret configured")]
    SecretUnconfigured,

    #[error("Invalid token")]
    Mismatch,
}

/// Errors raised by a [`crate::StorageSink`].
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("Stored file already exists: {0}")]
    AlreadyExists(String),

    #[error("Stored file not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort an ingestion request.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File too large: exceeds maximum of {limit} bytes")]
    SizeLimitExceeded { limit: usize },

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("Failed to write uploaded file: {0}")]
    WriteFailure(#[from] StorageError),
}

impl IngestError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMultipart(message.into())
    }
}

/// The `metadata` field was present but not valid JSON.
///
/// Always recovered locally: the scan proceeds with empty metadata.
#[derive(Error, Debug)]
#[error("Invalid metadata JSON: {0}")]
pub struct MetadataParseError(#[from] pub serde_json::Error);

pub type StorageResult<T> = std::result::Result<T, StorageError>;
