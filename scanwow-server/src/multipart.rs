//! Multipart decoding for scan uploads
//!
//! Walks a `multipart/form-data` body part by part and feeds it into a
//! [`ScanIntake`]. Parts with a `filename` in their Content-Disposition are
//! file parts regardless of field name; all other parts are text fields.
//! Every part is read chunk by chunk and rejected as soon as it grows past the
//! per-file limit, so memory stays bounded by that limit.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use bytes::{Bytes, BytesMut};
use scanwow_core::{IngestError, ScanIntake, ScanSummary};

use crate::state::AppState;
use crate::validation::validate_file_size;

/// Decode a whole scan upload, store its files and summarize it.
///
/// On failure, files already stored for this request are removed before the
/// error is returned.
pub async fn ingest(multipart: &mut Multipart, state: &AppState) -> Result<ScanSummary, IngestError> {
    let mut intake = ScanIntake::new(state.sink.as_ref(), &state.namer);

    match decode_scan(multipart, &mut intake, state.max_file_size).await {
        Ok(()) => Ok(intake.finish()),
        Err(e) => {
            intake.abandon().await;
            Err(e)
        }
    }
}

/// Feed every part of `multipart` into `intake`.
pub async fn decode_scan(
    multipart: &mut Multipart,
    intake: &mut ScanIntake<'_>,
    max_file_size: usize,
) -> Result<(), IngestError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to parse multipart", e))?
    {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(str::to_string);

        let data = read_bounded(&mut field, max_file_size).await?;

        match file_name {
            Some(file_name) => {
                intake.accept_file(Some(&file_name), data).await?;
            }
            None => {
                let value = String::from_utf8_lossy(&data).into_owned();
                intake.accept_field(&name, value);
            }
        }
    }

    Ok(())
}

/// Read one part, failing once it exceeds `max_size` bytes.
async fn read_bounded(field: &mut Field<'_>, max_size: usize) -> Result<Bytes, IngestError> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        validate_file_size(buffer.len() + chunk.len(), max_size)?;
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

fn multipart_error(context: &str, e: MultipartError) -> IngestError {
    IngestError::malformed(format!("{}: {}", context, e.body_text()))
}
