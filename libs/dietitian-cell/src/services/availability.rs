use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use shared_database::{BookingFilter, NutritionStore};
use shared_models::dietitian::{AvailabilityRule, DayOfWeek};
use shared_models::time::{ClockTime, TimeFormatError};
use shared_utils::state::AppState;

use crate::models::{AvailabilityError, Slot};

pub const SLOT_MINUTES: u16 = 30;

/// Expand one weekday rule into 30-minute windows, skipping windows whose start
/// is already taken.
///
/// Only the window start is checked against the rule's end time, so the last
/// window may run past it: 09:00-09:15 still yields 09:00-09:30. Window ends
/// stop at 24:00.
pub fn generate_slots(
    rule: &AvailabilityRule,
    taken_starts: &[ClockTime],
) -> Result<Vec<Slot>, TimeFormatError> {
    if !rule.is_available {
        return Ok(Vec::new());
    }

    let (start, end) = rule.window()?;

    let mut slots = Vec::new();
    let mut current = start;

    while current < end {
        let slot_end = current.plus_minutes(SLOT_MINUTES);

        if !taken_starts.contains(&current) {
            slots.push(Slot {
                start: current,
                end: slot_end,
            });
        }

        current = slot_end;
    }

    Ok(slots)
}

pub struct AvailabilityService {
    store: Arc<dyn NutritionStore>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Free slots for a dietitian on `date`, recomputed from current bookings.
    pub async fn get_available_slots(
        &self,
        dietitian_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, AvailabilityError> {
        debug!("Calculating available slots for dietitian {} on {}", dietitian_id, date);

        let dietitian = self
            .store
            .find_dietitian_by_id(dietitian_id)
            .await?
            .ok_or(AvailabilityError::DietitianNotFound)?;

        let day = DayOfWeek::of_date(date);
        let rule = match dietitian.availability.rule_for(day) {
            Some(rule) if rule.is_available => rule,
            _ => {
                debug!("Dietitian {} is not available on {}", dietitian_id, day);
                return Ok(Vec::new());
            }
        };

        let filter = BookingFilter::for_dietitian(dietitian_id)
            .on_date(date)
            .active();
        let taken_starts: Vec<ClockTime> = self
            .store
            .find_bookings(&filter)
            .await?
            .iter()
            .map(|booking| booking.time_slot.start)
            .collect();

        let slots = generate_slots(rule, &taken_starts)?;

        debug!("Found {} available slots", slots.len());
        Ok(slots)
    }
}
