//! Row types for the planner tables
//!
//! These serialize with the column names as keys, which is what the
//! planner endpoints return under `data`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crop {
    pub id: i64,
    pub name: String,
    pub soil_types: Vec<String>,
    pub suitable_seasons: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A saved plan (`planner` table)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: String,
    pub user_id: String,
    pub soil_type: String,
    pub season: String,
    /// Free-form location as supplied by the client
    pub location: Value,
    /// Free-form crop selection as supplied by the client
    pub selected_crops: Value,
    pub created_at: DateTime<Utc>,
}

/// Plan fields supplied by the caller; id and timestamp are assigned on insert
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub user_id: String,
    pub soil_type: String,
    pub season: String,
    pub location: Value,
    pub selected_crops: Value,
}
