//! Error types for cropwise-server handlers
//!
//! The two route groups answer errors in different envelopes:
//! - planner: `{"success": false, "message": ..., "error"?: ...}`
//! - OCR: `{"error": "OCR Failed", "details": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::VisionError;

/// Planner endpoint errors
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Missing or malformed request fields (400)
    #[error("{0}")]
    BadRequest(String),

    /// Query failed (500); `message` names the operation
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: cropwise_common::Error,
    },
}

impl PlannerError {
    pub fn database(message: &'static str) -> impl FnOnce(cropwise_common::Error) -> Self {
        move |source| PlannerError::Database { message, source }
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        match self {
            PlannerError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": message,
                })),
            )
                .into_response(),
            PlannerError::Database { message, source } => {
                error!(error = %source, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": message,
                        "error": source.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// OCR upload errors
#[derive(Debug, Error)]
pub enum OcrError {
    /// No `image` field in the multipart body (400)
    #[error("No image file uploaded (expected multipart field 'image')")]
    MissingImage,

    /// Multipart body could not be read (400)
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Upload could not be written to the uploads directory (500)
    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),

    /// Text recognition failed (500)
    #[error("{0}")]
    Recognition(#[from] VisionError),
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = match self {
            OcrError::MissingImage | OcrError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            OcrError::Storage(_) | OcrError::Recognition(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!(error = %self, "OCR Error");

        let body = Json(json!({
            "error": "OCR Failed",
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}
