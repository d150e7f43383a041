//! cropwise-server library
//!
//! Soil report OCR with nutrient extraction, and a crop planner backed by
//! SQLite that picks crops for the current season at a location.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{OcrError, PlannerError};
use crate::services::{TextRecognizer, WeatherProvider};

/// Largest accepted request body (image uploads)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Current-temperature source for season classification
    pub weather: Arc<dyn WeatherProvider>,
    /// OCR backend for uploaded soil reports
    pub recognizer: Arc<dyn TextRecognizer>,
    /// Where uploaded images are kept
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        weather: Arc<dyn WeatherProvider>,
        recognizer: Arc<dyn TextRecognizer>,
        uploads_dir: PathBuf,
    ) -> Self {
        Self {
            db,
            weather,
            recognizer,
            uploads_dir,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/ocr", api::ocr_routes())
        .nest("/api/planner", api::planner_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
