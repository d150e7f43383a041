//! Saved plan persistence (`planner` table)

use chrono::{DateTime, SecondsFormat, Utc};
use cropwise_common::{Error, Result};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::models::{NewPlan, Plan};

/// Insert a plan stamped with `created_at` and return the stored row
pub async fn insert_plan(
    pool: &SqlitePool,
    plan: &NewPlan,
    created_at: DateTime<Utc>,
) -> Result<Plan> {
    let id = Uuid::new_v4().to_string();
    let location = serde_json::to_string(&plan.location)?;
    let selected_crops = serde_json::to_string(&plan.selected_crops)?;
    // Fixed-width UTC form keeps lexical order equal to time order
    let created_at_str = created_at.to_rfc3339_opts(SecondsFormat::Micros, true);

    sqlx::query(
        r#"
        INSERT INTO planner (id, user_id, soil_type, season, location, selected_crops, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&plan.user_id)
    .bind(&plan.soil_type)
    .bind(&plan.season)
    .bind(&location)
    .bind(&selected_crops)
    .bind(&created_at_str)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        r#"
        SELECT id, user_id, soil_type, season, location, selected_crops, created_at
        FROM planner
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_one(pool)
    .await?;

    plan_from_row(&row)
}

/// Plans belonging to `user_id`, newest first
pub async fn plans_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Plan>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, soil_type, season, location, selected_crops, created_at
        FROM planner
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(plan_from_row).collect()
}

fn plan_from_row(row: &SqliteRow) -> Result<Plan> {
    let location: String = row.get("location");
    let selected_crops: String = row.get("selected_crops");

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Plan {
        id: row.get("id"),
        user_id: row.get("user_id"),
        soil_type: row.get("soil_type"),
        season: row.get("season"),
        location: serde_json::from_str(&location)?,
        selected_crops: serde_json::from_str(&selected_crops)?,
        created_at,
    })
}
