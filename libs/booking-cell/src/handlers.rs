use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::CurrentUser;
use shared_models::error::AppError;
use shared_utils::extractor::{AppJson, AppPath};
use shared_utils::state::AppState;

use crate::models::{CreateBookingRequest, UpdateStatusRequest};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(request): AppJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking = BookingService::new(&state)
        .create_booking(&user, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Booking created",
            "booking": booking
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let bookings = BookingService::new(&state).get_user_bookings(&user).await?;

    Ok(Json(json!(bookings)))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppPath(booking_id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state)
        .update_booking_status(&user, booking_id, request.status.as_deref())
        .await?;

    Ok(Json(json!({
        "message": "Booking status updated",
        "booking": booking
    })))
}
