//! Crop planner endpoints
//!
//! - POST /api/planner/suggest-crops
//! - POST /api/planner/save-plan
//! - GET  /api/planner/user-plans/:userId
//! - GET  /api/planner/soil-types

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::db::{self, Crop, NewPlan, Plan, SoilType};
use crate::error::PlannerError;
use crate::services::{season, Coordinate, Season};
use crate::AppState;

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }
}

/// JSON scalar that clients send either as a number or as a string,
/// e.g. form values like `"28.6"` or a numeric user id
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Numeric value; strings must parse as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(t) => t.trim().parse().ok(),
        }
    }

    /// Text value; numbers are rendered in JSON form
    pub fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(t) => t,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCropsRequest {
    pub soil_type: Option<String>,
    pub latitude: Option<Scalar>,
    pub longitude: Option<Scalar>,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub season: Season,
    pub crops: Vec<Crop>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanRequest {
    pub soil_type: Option<String>,
    pub season: Option<String>,
    pub location: Option<Value>,
    pub selected_crops: Option<Value>,
    pub user_id: Option<Scalar>,
}

/// POST /api/planner/suggest-crops
///
/// Classifies the current season at the coordinate and returns crops that
/// list both the soil type and that season.
pub async fn suggest_crops(
    State(state): State<AppState>,
    body: Result<Json<SuggestCropsRequest>, JsonRejection>,
) -> Result<Json<Envelope<Suggestion>>, PlannerError> {
    let Json(request) = body.map_err(|e| PlannerError::BadRequest(e.body_text()))?;

    let (soil_type, latitude, longitude) = match (
        non_blank(request.soil_type),
        request.latitude.as_ref().and_then(Scalar::as_f64),
        request.longitude.as_ref().and_then(Scalar::as_f64),
    ) {
        (Some(s), Some(lat), Some(lon)) => (s, lat, lon),
        _ => {
            return Err(PlannerError::BadRequest(
                "Soil type, latitude, and longitude are required".to_string(),
            ))
        }
    };

    let season = season::classify(state.weather.as_ref(), Coordinate::new(latitude, longitude)).await;

    let crops = db::find_suitable_crops(&state.db, &soil_type, season.as_str())
        .await
        .map_err(PlannerError::database("Error fetching crop suggestions"))?;

    info!(
        soil_type = %soil_type,
        season = %season,
        crops = crops.len(),
        "Crop suggestions computed"
    );

    Ok(Envelope::ok(Suggestion { season, crops }))
}

/// POST /api/planner/save-plan
pub async fn save_plan(
    State(state): State<AppState>,
    body: Result<Json<SavePlanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Vec<Plan>>>), PlannerError> {
    let Json(request) = body.map_err(|e| PlannerError::BadRequest(e.body_text()))?;

    let plan = match (
        non_blank(request.soil_type),
        non_blank(request.season),
        request.location,
        request.selected_crops,
        non_blank(request.user_id.map(Scalar::into_text)),
    ) {
        (Some(soil_type), Some(season), Some(location), Some(selected_crops), Some(user_id)) => {
            NewPlan {
                user_id,
                soil_type,
                season,
                location,
                selected_crops,
            }
        }
        _ => return Err(PlannerError::BadRequest("Missing required fields".to_string())),
    };

    let saved = db::insert_plan(&state.db, &plan, Utc::now())
        .await
        .map_err(PlannerError::database("Error saving plan"))?;

    info!(plan_id = %saved.id, user_id = %saved.user_id, "Plan saved");

    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: Some("Plan saved successfully"),
            data: vec![saved],
        }),
    ))
}

/// GET /api/planner/user-plans/:userId
pub async fn user_plans(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Envelope<Vec<Plan>>>, PlannerError> {
    if user_id.trim().is_empty() {
        return Err(PlannerError::BadRequest("User ID is required".to_string()));
    }

    let plans = db::plans_for_user(&state.db, &user_id)
        .await
        .map_err(PlannerError::database("Error fetching plans"))?;

    Ok(Envelope::ok(plans))
}

/// GET /api/planner/soil-types
pub async fn soil_types(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<SoilType>>>, PlannerError> {
    let soils = db::list_soil_types(&state.db)
        .await
        .map_err(PlannerError::database("Error fetching soil types"))?;

    Ok(Envelope::ok(soils))
}

/// Build planner routes (mounted under `/api/planner`)
pub fn planner_routes() -> Router<AppState> {
    Router::new()
        .route("/suggest-crops", post(suggest_crops))
        .route("/save-plan", post(save_plan))
        .route("/user-plans/:user_id", get(user_plans))
        .route("/soil-types", get(soil_types))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
