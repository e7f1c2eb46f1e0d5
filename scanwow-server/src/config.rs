//! Server configuration module
//!
//! Handles loading configuration from environment variables with sensible defaults.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use scanwow_core::Credential;

use crate::validation::DEFAULT_MAX_FILE_SIZE_MB;

const MIB: usize = 1024 * 1024;

/// Where uploaded files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Flat directory on local disk (default)
    Filesystem,
    /// Process memory, for dry runs and tests
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "filesystem" | "fs" | "disk" => Some(Self::Filesystem),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    /// Server port (default: 3000)
    pub port: u16,
    /// Server host (default: 127.0.0.1)
    pub host: [u8; 4],
    /// Shared bearer secret (SCANWOW_TOKEN). `None` means every scan request gets a 500.
    pub auth_token: Option<Credential>,
    /// Directory for stored scan pages (default: uploads)
    pub upload_dir: PathBuf,
    /// Storage backend (default: filesystem)
    pub storage_backend: StorageBackend,
    /// Maximum size of a single uploaded file in MB (default: 50)
    pub max_file_size_mb: usize,
    /// Optional cap on the whole request body in MB (default: none)
    pub body_limit_mb: Option<usize>,
    /// Allowed CORS origins, comma-separated (default: allow all)
    pub allowed_origins: Option<Vec<String>>,
    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
    /// Enable rate limiting (default: false for tests, true when loaded from env)
    pub rate_limit_enabled: bool,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u64,
    /// Rate limit: burst size (default: 20)
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            host: [127, 0, 0, 1],
            auth_token: None,
            upload_dir: PathBuf::from("uploads"),
            storage_backend: StorageBackend::Filesystem,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            body_limit_mb: None,
            allowed_origins: None, // None = allow all
            timeout_secs: 120,
            rate_limit_enabled: false, // Disabled by default (for tests)
            rate_limit_per_sec: 10,
            rate_limit_burst: 20,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("upload_dir", &self.upload_dir)
            .field("storage_backend", &self.storage_backend)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("body_limit_mb", &self.body_limit_mb)
            .field("allowed_origins", &self.allowed_origins)
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("rate_limit_per_sec", &self.rate_limit_per_sec)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let host = lookup("HOST")
            .map(|h| {
                if h == "0.0.0.0" {
                    [0, 0, 0, 0]
                } else {
                    [127, 0, 0, 1]
                }
            })
            .unwrap_or(defaults.host);

        let auth_token = lookup("SCANWOW_TOKEN").and_then(|t| Credential::new(t));

        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let storage_backend = lookup("STORAGE_BACKEND")
            .and_then(|v| {
                let parsed = StorageBackend::parse(&v);
                if parsed.is_none() {
                    tracing::warn!(value = %v, "Unknown STORAGE_BACKEND, using filesystem");
                }
                parsed
            })
            .unwrap_or(defaults.storage_backend);

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|mb| *mb > 0)
            .unwrap_or(defaults.max_file_size_mb);

        let body_limit_mb = lookup("BODY_LIMIT_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|mb| *mb > 0);

        let allowed_origins = lookup("ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        // Rate limiting enabled by default in production, can be disabled with RATE_LIMIT_ENABLED=false
        let rate_limit_enabled = lookup("RATE_LIMIT_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let rate_limit_per_sec = lookup("RATE_LIMIT_PER_SEC")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_per_sec);

        let rate_limit_burst = lookup("RATE_LIMIT_BURST")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_burst);

        Self {
            port,
            host,
            auth_token,
            upload_dir,
            storage_backend,
            max_file_size_mb,
            body_limit_mb,
            allowed_origins,
            timeout_secs,
            rate_limit_enabled,
            rate_limit_per_sec,
            rate_limit_burst,
        }
    }

    /// Get socket address from config
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Per-file upload limit in bytes
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(MIB)
    }

    /// Whole-body cap in bytes, when configured
    pub fn body_limit_bytes(&self) -> Option<usize> {
        self.body_limit_mb.map(|mb| mb.saturating_mul(MIB))
    }

    /// Set the bearer secret (builder style, for tests and embedding)
    pub fn with_token(mut self, token: &str) -> Self {
        self.auth_token = Credential::new(token);
        self
    }
}
