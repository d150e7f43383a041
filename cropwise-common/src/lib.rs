//! # Cropwise Common Library
//!
//! Shared code for the cropwise service:
//! - Error type and result alias
//! - Bootstrap configuration (TOML + environment)
//! - Database initialization, schema and seed data

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
