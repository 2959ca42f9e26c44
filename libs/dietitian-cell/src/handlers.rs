use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::CurrentUser;
use shared_models::error::AppError;
use shared_models::time::parse_calendar_date;
use shared_utils::extractor::{AppJson, AppPath, AppQuery};
use shared_utils::state::AppState;

use crate::models::{AvailableSlotsResponse, UpdateDietitianProfileRequest};
use crate::services::{AvailabilityService, DietitianService};

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: Option<String>,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_dietitians(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dietitians = DietitianService::new(&state).list_dietitians().await?;

    Ok(Json(json!(dietitians)))
}

#[axum::debug_handler]
pub async fn get_dietitian(
    State(state): State<AppState>,
    AppPath(dietitian_id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let dietitian = DietitianService::new(&state).get_dietitian(dietitian_id).await?;

    Ok(Json(json!(dietitian)))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<AppState>,
    AppPath(dietitian_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let raw_date = query
        .date
        .ok_or_else(|| AppError::ValidationError("date query parameter is required".to_string()))?;
    let date = parse_calendar_date(&raw_date).map_err(|e| AppError::ValidationError(e.to_string()))?;

    debug!("Available slots requested for dietitian {} on {}", dietitian_id, date);

    let available_slots = AvailabilityService::new(&state)
        .get_available_slots(dietitian_id, date)
        .await?;

    Ok(Json(AvailableSlotsResponse { available_slots }))
}

// ==============================================================================
// DIETITIAN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(request): AppJson<UpdateDietitianProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let dietitian = DietitianService::new(&state)
        .update_profile(&user, request)
        .await?;

    Ok(Json(json!({
        "message": "Profile updated",
        "dietitian": dietitian
    })))
}

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let dashboard = DietitianService::new(&state).dashboard(&user).await?;

    Ok(Json(json!(dashboard)))
}
