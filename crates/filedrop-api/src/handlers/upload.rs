//! Multipart upload handler
//!
//! One request, one file: find the configured part, make sure the upload
//! directory exists, stream the part into a freshly named file, reply with a
//! plain-text line. Every step is terminal on failure and nothing is retried.

use std::time::Instant;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use filedrop_core::{DiskStore, StoredArtifact};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned for an accepted upload
pub const UPLOAD_OK: &str = "File successfully uploaded\n";

/// POST /upload (and configured aliases)
/// Store the configured file field of a multipart form
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, ApiError> {
    let started = Instant::now();

    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Upload body is not multipart");
        ApiError::malformed_form()
    })?;

    while let Some(mut field) = multipart.next_field().await.map_err(form_error)? {
        // Only a file part counts; a plain value under the same name is skipped
        let file_name = match field.file_name() {
            Some(name) if field.name() == Some(state.field_name()) => name.to_owned(),
            _ => {
                tracing::trace!(name = ?field.name(), "Skipping form field");
                continue;
            }
        };

        let artifact = store_field(state.store(), &mut field).await?;

        tracing::info!(
            artifact = %artifact.name,
            file_name = %file_name,
            size = artifact.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "File uploaded"
        );

        return Ok(UPLOAD_OK);
    }

    Err(ApiError::missing_file())
}

/// Fallback for every method other than POST (and OPTIONS when CORS answers it)
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Stream one multipart field into a new artifact.
///
/// A partially written file is removed before any error is returned.
async fn store_field(
    store: &DiskStore,
    field: &mut Field<'_>,
) -> Result<StoredArtifact, ApiError> {
    store.ensure_dir().await?;
    let mut writer = store.create().await?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                writer.discard().await;
                return Err(form_error(e));
            }
        };

        if let Err(e) = writer.write_chunk(&chunk).await {
            writer.discard().await;
            return Err(e.into());
        }
    }

    Ok(writer.finish().await?)
}

fn form_error(err: MultipartError) -> ApiError {
    tracing::debug!(error = %err, status = %err.status(), "Failed to read multipart body");
    ApiError::malformed_form()
}
