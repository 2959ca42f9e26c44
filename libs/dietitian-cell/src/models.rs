use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::booking::BookingView;
use shared_models::dietitian::{AvailabilityTemplate, Dietitian};
use shared_models::error::AppError;
use shared_models::time::{ClockTime, TimeFormatError};

/// A derived 30-minute window; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub available_slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDietitianProfileRequest {
    pub qualifications: Option<Vec<String>>,
    pub specialization: Option<Vec<String>>,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    pub availability: Option<AvailabilityTemplate>,
    pub price_per_session: Option<f64>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietitianDashboard {
    pub dietitian: Dietitian,
    pub upcoming_bookings: Vec<BookingView>,
    pub recent_bookings: Vec<BookingView>,
}

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("Dietitian not found")]
    DietitianNotFound,

    #[error(transparent)]
    InvalidTime(#[from] TimeFormatError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::DietitianNotFound => AppError::NotFound(err.to_string()),
            AvailabilityError::InvalidTime(e) => AppError::ValidationError(e.to_string()),
            AvailabilityError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DietitianError {
    #[error("Dietitian not found")]
    NotFound,

    #[error("Dietitian profile not found")]
    ProfileNotFound,

    #[error("Dietitian access required")]
    NotADietitian,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TimeFormatError> for DietitianError {
    fn from(err: TimeFormatError) -> Self {
        DietitianError::Validation(err.to_string())
    }
}

impl From<DietitianError> for AppError {
    fn from(err: DietitianError) -> Self {
        match err {
            DietitianError::NotFound | DietitianError::ProfileNotFound => {
                AppError::NotFound(err.to_string())
            }
            DietitianError::NotADietitian => AppError::Forbidden(err.to_string()),
            DietitianError::Validation(msg) => AppError::ValidationError(msg),
            DietitianError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
