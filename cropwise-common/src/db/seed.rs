//! Reference data for a fresh database
//!
//! Soil types and crops are only inserted into empty tables, so operator
//! edits to an existing database are never overwritten.

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

const SOIL_TYPES: &[(&str, &str)] = &[
    ("alluvial", "River-deposited, fertile and well drained"),
    ("black", "Clay-rich, retains moisture, suits cotton"),
    ("clay", "Fine particles, slow draining, nutrient dense"),
    ("loamy", "Balanced sand, silt and clay"),
    ("red", "Iron-rich, low in nitrogen, drains quickly"),
    ("sandy", "Coarse, fast draining, warms early"),
];

/// (name, soil types, seasons, description)
const CROPS: &[(&str, &[&str], &[&str], &str)] = &[
    ("wheat", &["loamy", "clay", "alluvial"], &["fall", "winter"], "Cool-season cereal"),
    ("rice", &["clay", "alluvial"], &["summer"], "Needs standing water"),
    ("maize", &["loamy", "sandy", "red"], &["spring", "summer"], "Warm-season cereal"),
    ("cotton", &["black", "alluvial"], &["summer"], "Long warm season fibre crop"),
    ("tomato", &["loamy", "sandy"], &["spring", "summer"], "Frost sensitive"),
    ("potato", &["loamy", "sandy"], &["spring", "fall", "winter"], "Prefers loose soil"),
    ("mustard", &["loamy", "alluvial"], &["winter"], "Oilseed, tolerates cold"),
    ("groundnut", &["sandy", "red"], &["summer"], "Legume, needs light soil"),
    ("spinach", &["loamy", "clay"], &["spring", "fall", "winter"], "Quick leafy green"),
    ("chickpea", &["black", "loamy"], &["fall", "winter"], "Dryland legume"),
];

/// Insert default soil types and crops when the tables are empty
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<()> {
    let soil_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM soil_types")
        .fetch_one(pool)
        .await?;

    if soil_count == 0 {
        for (name, description) in SOIL_TYPES {
            sqlx::query("INSERT INTO soil_types (name, description) VALUES (?, ?)")
                .bind(*name)
                .bind(*description)
                .execute(pool)
                .await?;
        }
        info!(count = SOIL_TYPES.len(), "Seeded soil_types");
    }

    let crop_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
        .fetch_one(pool)
        .await?;

    if crop_count == 0 {
        for (name, soils, seasons, description) in CROPS {
            sqlx::query(
                "INSERT INTO crops (name, soil_types, suitable_seasons, description) VALUES (?, ?, ?, ?)",
            )
            .bind(*name)
            .bind(serde_json::to_string(soils)?)
            .bind(serde_json::to_string(seasons)?)
            .bind(*description)
            .execute(pool)
            .await?;
        }
        info!(count = CROPS.len(), "Seeded crops");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init_schema(&pool).await.expect("schema");
        pool
    }

    #[tokio::test]
    async fn test_seed_populates_empty_tables() {
        let pool = memory_pool().await;
        seed_reference_data(&pool).await.unwrap();

        let soils: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM soil_types")
            .fetch_one(&pool)
            .await
            .unwrap();
        let crops: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(soils, SOIL_TYPES.len() as i64);
        assert_eq!(crops, CROPS.len() as i64);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = memory_pool().await;
        seed_reference_data(&pool).await.unwrap();
        seed_reference_data(&pool).await.unwrap();

        let crops: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(crops, CROPS.len() as i64);
    }

    #[tokio::test]
    async fn test_seed_leaves_existing_rows_alone() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO crops (name, soil_types, suitable_seasons) VALUES ('barley', '[\"loamy\"]', '[\"winter\"]')")
            .execute(&pool)
            .await
            .unwrap();

        seed_reference_data(&pool).await.unwrap();

        let crops: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(crops, 1);
    }

    #[test]
    fn test_seed_seasons_are_known_labels() {
        for (_, _, seasons, _) in CROPS {
            for season in *seasons {
                assert!(["spring", "summer", "fall", "winter"].contains(season));
            }
        }
    }
}
