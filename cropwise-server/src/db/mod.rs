//! Database access for cropwise-server
//!
//! Schema creation and reference data live in `cropwise_common::db`;
//! this module holds the queries the handlers run.

pub mod crops;
pub mod models;
pub mod plans;

pub use crops::{find_suitable_crops, list_soil_types};
pub use models::{Crop, NewPlan, Plan, SoilType};
pub use plans::{insert_plan, plans_for_user};

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the service database, creating and seeding it if needed
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = cropwise_common::db::init_database(db_path).await?;
    Ok(pool)
}

/// Single-connection in-memory database with schema and seed data
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    cropwise_common::db::init_schema(&pool)
        .await
        .expect("Failed to create schema");
    cropwise_common::db::seed_reference_data(&pool)
        .await
        .expect("Failed to seed reference data");
    pool
}
