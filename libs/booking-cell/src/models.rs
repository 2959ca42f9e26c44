use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::booking::{BookingStatus, ConsultationType};
use shared_models::error::AppError;
use shared_models::time::TimeFormatError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSlotRequest {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Body of `POST /api/booking`. Fields are optional so that missing values
/// surface as validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub dietitian_id: Option<String>,
    pub date: Option<String>,
    pub time_slot: Option<TimeSlotRequest>,
    pub consultation_type: Option<ConsultationType>,
    pub notes: Option<String>,
    pub goals: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Dietitian not found")]
    DietitianNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Slot already booked")]
    SlotAlreadyBooked,

    #[error("Not authorized to update this booking")]
    NotAuthorized,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken => BookingError::SlotAlreadyBooked,
            other => BookingError::Store(other),
        }
    }
}

impl From<TimeFormatError> for BookingError {
    fn from(err: TimeFormatError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::DietitianNotFound | BookingError::BookingNotFound => {
                AppError::NotFound(err.to_string())
            }
            BookingError::SlotAlreadyBooked => AppError::BadRequest(err.to_string()),
            BookingError::NotAuthorized => AppError::Forbidden(err.to_string()),
            BookingError::InvalidStatusTransition { .. } => AppError::ValidationError(err.to_string()),
            BookingError::Validation(msg) => AppError::ValidationError(msg),
            BookingError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
