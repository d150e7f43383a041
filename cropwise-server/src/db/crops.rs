//! Crop and soil type lookups

use cropwise_common::{Error, Result};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::models::{Crop, SoilType};

/// Crops whose soil list contains `soil_type` and whose season list
/// contains `season`, ordered by name
pub async fn find_suitable_crops(
    pool: &SqlitePool,
    soil_type: &str,
    season: &str,
) -> Result<Vec<Crop>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, soil_types, suitable_seasons, description
        FROM crops
        WHERE EXISTS (SELECT 1 FROM json_each(crops.soil_types) WHERE json_each.value = ?)
          AND EXISTS (SELECT 1 FROM json_each(crops.suitable_seasons) WHERE json_each.value = ?)
        ORDER BY name ASC
        "#,
    )
    .bind(soil_type)
    .bind(season)
    .fetch_all(pool)
    .await?;

    rows.iter().map(crop_from_row).collect()
}

/// All soil types, ordered by name
pub async fn list_soil_types(pool: &SqlitePool) -> Result<Vec<SoilType>> {
    let rows = sqlx::query("SELECT id, name, description FROM soil_types ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| SoilType {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
        })
        .collect())
}

fn crop_from_row(row: &SqliteRow) -> Result<Crop> {
    let name: String = row.get("name");

    let soil_types: String = row.get("soil_types");
    let soil_types: Vec<String> = serde_json::from_str(&soil_types).map_err(|e| {
        Error::Internal(format!("crop '{}' has malformed soil_types: {}", name, e))
    })?;

    let suitable_seasons: String = row.get("suitable_seasons");
    let suitable_seasons: Vec<String> = serde_json::from_str(&suitable_seasons).map_err(|e| {
        Error::Internal(format!("crop '{}' has malformed suitable_seasons: {}", name, e))
    })?;

    Ok(Crop {
        id: row.get("id"),
        name,
        soil_types,
        suitable_seasons,
        description: row.get("description"),
    })
}
