use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::booking::{Booking, BookingStatus};
use shared_models::dietitian::Dietitian;
use shared_models::time::ClockTime;
use shared_models::user::UserProfile;

#[derive(Debug, Error)]
pub enum StoreError {
    /// An active booking already holds (dietitian, date, slot start).
    #[error("Slot already booked")]
    SlotTaken,

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store request failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingOrder {
    /// Date ascending, then slot start ascending.
    #[default]
    DateAsc,
    /// Date descending, then slot start descending.
    DateDesc,
    /// Newest record first.
    CreatedDesc,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub user: Option<Uuid>,
    pub dietitian: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub statuses: Option<Vec<BookingStatus>>,
    pub slot_start: Option<ClockTime>,
    pub order: BookingOrder,
    pub limit: Option<usize>,
}

impl BookingFilter {
    pub fn for_dietitian(dietitian: Uuid) -> Self {
        Self {
            dietitian: Some(dietitian),
            ..Self::default()
        }
    }

    pub fn for_user(user: Uuid) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn active(mut self) -> Self {
        self.statuses = Some(BookingStatus::ACTIVE.to_vec());
        self
    }

    pub fn starting_at(mut self, start: ClockTime) -> Self {
        self.slot_start = Some(start);
        self
    }

    pub fn ordered(mut self, order: BookingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.user.map_or(true, |user| booking.user == user)
            && self.dietitian.map_or(true, |dietitian| booking.dietitian == dietitian)
            && self.date.map_or(true, |date| booking.date == date)
            && self.date_from.map_or(true, |from| booking.date >= from)
            && self
                .statuses
                .as_ref()
                .map_or(true, |statuses| statuses.contains(&booking.status))
            && self.slot_start.map_or(true, |start| booking.time_slot.start == start)
    }
}

pub fn compare_bookings(order: BookingOrder, a: &Booking, b: &Booking) -> Ordering {
    match order {
        BookingOrder::DateAsc => a
            .date
            .cmp(&b.date)
            .then(a.time_slot.start.cmp(&b.time_slot.start)),
        BookingOrder::DateDesc => b
            .date
            .cmp(&a.date)
            .then(b.time_slot.start.cmp(&a.time_slot.start)),
        BookingOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
    }
}

/// Persistence collaborator for dietitians, user profiles and bookings.
#[async_trait]
pub trait NutritionStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn find_dietitian_by_id(&self, id: Uuid) -> Result<Option<Dietitian>, StoreError>;

    async fn find_dietitian_by_user(&self, user_id: Uuid) -> Result<Option<Dietitian>, StoreError>;

    async fn list_verified_dietitians(&self) -> Result<Vec<Dietitian>, StoreError>;

    async fn save_dietitian(&self, dietitian: Dietitian) -> Result<Dietitian, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn find_booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError>;

    /// Inserts the booking unless an active booking already holds the same
    /// (dietitian, date, slot start). Check and insert happen as one step;
    /// a lost race surfaces as [`StoreError::SlotTaken`].
    async fn create_booking(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn save_booking(&self, booking: Booking) -> Result<Booking, StoreError>;
}
