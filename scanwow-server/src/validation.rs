//! Upload validation module
//!
//! Provides validation utilities for multipart file uploads.

use scanwow_core::IngestError;

/// Default max file size in MB
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 50;

/// Validates the size of an uploaded part
///
/// Returns an error if the part exceeds the maximum size.
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), IngestError> {
    if size > max_size {
        Err(IngestError::SizeLimitExceeded { limit: max_size })
    } else {
        Ok(())
    }
}
