//! Media upload handler.
//!
//! Writes to the configured media directory, a stand-in for the external
//! media host. The returned URL is served from `/media` under the public
//! base URL.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use backlot_core::error::CoreError;
use backlot_core::id::new_entity_id;

use crate::error::{AppError, AppResult};
use crate::middleware::RequireContent;
use crate::state::AppState;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image MIME types with their storage extensions.
const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

/// POST /api/upload
///
/// Multipart with a single `file` field. Rejects anything over 5 MB or
/// outside the image MIME allowlist before touching the filesystem.
pub async fn upload(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let field = loop {
        let next = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;
        match next {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::Core(CoreError::invalid_field(
                    "file",
                    "is required",
                )));
            }
        }
    };

    let mime_type = field.content_type().unwrap_or_default().to_string();
    let extension = ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_field(
                "file",
                "must be a JPEG, PNG, GIF, or WebP image",
            ))
        })?;

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Core(CoreError::invalid_field(
            "file",
            "must be 5 MB or smaller",
        )));
    }

    let filename = format!("{}.{extension}", new_entity_id());
    let dir = std::path::Path::new(&state.config.media_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create media directory: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

    tracing::info!(%filename, size = data.len(), actor = %user.user_id, "media uploaded");

    let response = UploadResponse {
        url: format!("{}/media/{filename}", state.config.public_base_url),
        filename,
        size: data.len(),
        mime_type,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
