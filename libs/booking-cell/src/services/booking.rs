use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{BookingFilter, BookingOrder, NutritionStore};
use shared_models::auth::CurrentUser;
use shared_models::booking::{Booking, BookingStatus, BookingView, TimeSlot};
use shared_models::dietitian::{Dietitian, DietitianInfo};
use shared_models::time::{parse_calendar_date, ClockTime};
use shared_models::user::UserInfo;
use shared_utils::state::AppState;

use crate::models::{BookingError, CreateBookingRequest};
use crate::services::lifecycle::BookingLifecycleService;

pub struct BookingService {
    store: Arc<dyn NutritionStore>,
    lifecycle_service: BookingLifecycleService,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            lifecycle_service: BookingLifecycleService::new(),
        }
    }

    /// Books a slot for the caller. The slot is taken only if no pending or
    /// confirmed booking already starts at the same time for that dietitian
    /// and date.
    pub async fn create_booking(
        &self,
        caller: &CurrentUser,
        request: CreateBookingRequest,
    ) -> Result<BookingView, BookingError> {
        let dietitian_id = request
            .dietitian_id
            .as_deref()
            .ok_or_else(|| BookingError::Validation("dietitianId is required".to_string()))
            .and_then(|raw| {
                Uuid::parse_str(raw.trim())
                    .map_err(|_| BookingError::Validation(format!("Invalid dietitianId '{}'", raw)))
            })?;

        let date = request
            .date
            .as_deref()
            .ok_or_else(|| BookingError::Validation("date is required".to_string()))?;
        let date = parse_calendar_date(date)?;

        let slot = request
            .time_slot
            .ok_or_else(|| BookingError::Validation("timeSlot is required".to_string()))?;
        let (start, end) = match (slot.start.as_deref(), slot.end.as_deref()) {
            (Some(start), Some(end)) => (ClockTime::parse(start)?, ClockTime::parse(end)?),
            _ => {
                return Err(BookingError::Validation(
                    "timeSlot.start and timeSlot.end are required".to_string(),
                ))
            }
        };

        let dietitian = self
            .store
            .find_dietitian_by_id(dietitian_id)
            .await?
            .ok_or(BookingError::DietitianNotFound)?;

        let holders = self
            .store
            .find_bookings(
                &BookingFilter::for_dietitian(dietitian.id)
                    .on_date(date)
                    .starting_at(start)
                    .active(),
            )
            .await?;
        if !holders.is_empty() {
            debug!("Slot {} on {} already held for dietitian {}", start, date, dietitian.id);
            return Err(BookingError::SlotAlreadyBooked);
        }

        let booking = Booking::new_pending(
            caller.id,
            dietitian.id,
            date,
            TimeSlot { start, end },
            request.consultation_type.unwrap_or_default(),
            request.notes,
            request.goals.unwrap_or_default(),
        );

        // The store re-checks the slot atomically; a lost race maps to SlotAlreadyBooked.
        let booking = self.store.create_booking(booking).await?;
        info!(
            "Booking {} created for user {} with dietitian {} on {} at {}",
            booking.id, caller.id, dietitian.id, date, start
        );

        let user = self.store.find_user_by_id(caller.id).await?;
        Ok(BookingView::new(booking)
            .with_dietitian(Some(DietitianInfo::from(&dietitian)))
            .with_user(user.as_ref().map(UserInfo::from)))
    }

    /// The caller's bookings, latest date first.
    pub async fn get_user_bookings(&self, caller: &CurrentUser) -> Result<Vec<BookingView>, BookingError> {
        let bookings = self
            .store
            .find_bookings(&BookingFilter::for_user(caller.id).ordered(BookingOrder::DateDesc))
            .await?;
        debug!("Found {} bookings for user {}", bookings.len(), caller.id);

        let mut dietitians: HashMap<Uuid, Option<DietitianInfo>> = HashMap::new();
        let mut views = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let info = match dietitians.get(&booking.dietitian) {
                Some(info) => info.clone(),
                None => {
                    let info = self
                        .store
                        .find_dietitian_by_id(booking.dietitian)
                        .await?
                        .as_ref()
                        .map(DietitianInfo::from);
                    dietitians.insert(booking.dietitian, info.clone());
                    info
                }
            };
            views.push(BookingView::new(booking).with_dietitian(info));
        }

        Ok(views)
    }

    /// Moves a booking along its lifecycle on behalf of its user or the
    /// dietitian who owns it.
    pub async fn update_booking_status(
        &self,
        caller: &CurrentUser,
        booking_id: Uuid,
        status: Option<&str>,
    ) -> Result<BookingView, BookingError> {
        let mut booking = self
            .store
            .find_booking_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        let dietitian = self.store.find_dietitian_by_id(booking.dietitian).await?;
        if !Self::may_update(caller, &booking, dietitian.as_ref()) {
            warn!("User {} attempted to update booking {}", caller.id, booking.id);
            return Err(BookingError::NotAuthorized);
        }

        let new_status = status
            .ok_or_else(|| BookingError::Validation("status is required".to_string()))?
            .parse::<BookingStatus>()
            .map_err(|e| BookingError::Validation(e.to_string()))?;

        self.lifecycle_service
            .validate_status_transition(booking.status, new_status)?;

        let previous = booking.status;
        booking.status = new_status;
        booking.updated_at = Utc::now();

        let booking = self.store.save_booking(booking).await?;
        info!("Booking {} moved from {} to {}", booking.id, previous, booking.status);

        let user = self.store.find_user_by_id(booking.user).await?;
        Ok(BookingView::new(booking)
            .with_dietitian(dietitian.as_ref().map(DietitianInfo::from))
            .with_user(user.as_ref().map(UserInfo::from)))
    }

    fn may_update(caller: &CurrentUser, booking: &Booking, dietitian: Option<&Dietitian>) -> bool {
        booking.user == caller.id
            || dietitian.is_some_and(|dietitian| dietitian.user_id == caller.id)
    }
}
