//! Soil report OCR endpoint
//!
//! POST /api/ocr/upload takes a multipart body with an `image` file field,
//! keeps a copy under the uploads directory, sends the bytes for text
//! detection and extracts N, P, K and pH from the recognized text.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::OcrError;
use crate::services::{nutrients, NutrientReading};
use crate::AppState;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub message: &'static str,
    pub text: String,
    pub nutrients: NutrientReading,
}

/// POST /api/ocr/upload
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, OcrError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| OcrError::InvalidUpload(e.to_string()))?;
        upload = Some((original_name, data));
        break;
    }

    let (original_name, data) = upload.ok_or(OcrError::MissingImage)?;

    let stored = store_upload(&state.uploads_dir, &original_name, &data).await?;
    info!(path = %stored.display(), bytes = data.len(), "Stored uploaded image");

    let text = state.recognizer.recognize(&data).await?;
    let nutrients = nutrients::extract(&text);

    info!(
        characters = text.len(),
        nutrients_found = nutrients.found_count(),
        "OCR Successful"
    );

    Ok(Json(OcrResponse {
        message: "OCR Successful",
        text,
        nutrients,
    }))
}

/// Write the upload as `<millis>_<sanitized name>` inside `dir`
async fn store_upload(dir: &Path, original_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(upload_file_name(
        chrono::Utc::now().timestamp_millis(),
        original_name,
    ));
    tokio::fs::write(&path, data).await?;
    Ok(path)
}

/// Stored file name for an upload
///
/// Only the final path component of the client-supplied name is kept, and
/// anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn upload_file_name(timestamp_millis: i64, original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}_{}", timestamp_millis, sanitized)
}

/// Build OCR routes (mounted under `/api/ocr`)
pub fn ocr_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_image))
}
