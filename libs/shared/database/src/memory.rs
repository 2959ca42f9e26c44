use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::booking::Booking;
use shared_models::dietitian::Dietitian;
use shared_models::user::UserProfile;

use crate::store::{compare_bookings, BookingFilter, NutritionStore, StoreError};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserProfile>,
    dietitians: HashMap<Uuid, Dietitian>,
    bookings: HashMap<Uuid, Booking>,
}

impl Tables {
    fn slot_holder(&self, candidate: &Booking) -> Option<&Booking> {
        self.bookings.values().find(|existing| {
            existing.id != candidate.id
                && existing.occupies(candidate.dietitian, candidate.date, candidate.time_slot.start)
        })
    }
}

/// Process-local store. Every write runs under one lock, which makes booking
/// creation a single serialization point for all slots.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: UserProfile) -> UserProfile {
        let mut tables = self.tables.write().await;
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn booking_count(&self) -> usize {
        self.tables.read().await.bookings.len()
    }
}

#[async_trait]
impl NutritionStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_dietitian_by_id(&self, id: Uuid) -> Result<Option<Dietitian>, StoreError> {
        Ok(self.tables.read().await.dietitians.get(&id).cloned())
    }

    async fn find_dietitian_by_user(&self, user_id: Uuid) -> Result<Option<Dietitian>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .dietitians
            .values()
            .find(|dietitian| dietitian.user_id == user_id)
            .cloned())
    }

    async fn list_verified_dietitians(&self) -> Result<Vec<Dietitian>, StoreError> {
        let tables = self.tables.read().await;
        let mut dietitians: Vec<Dietitian> = tables
            .dietitians
            .values()
            .filter(|dietitian| dietitian.is_verified)
            .cloned()
            .collect();
        dietitians.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(dietitians)
    }

    async fn save_dietitian(&self, dietitian: Dietitian) -> Result<Dietitian, StoreError> {
        let mut tables = self.tables.write().await;
        tables.dietitians.insert(dietitian.id, dietitian.clone());
        Ok(dietitian)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();

        bookings.sort_by(|a, b| compare_bookings(filter.order, a, b));
        if let Some(limit) = filter.limit {
            bookings.truncate(limit);
        }

        Ok(bookings)
    }

    async fn create_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut tables = self.tables.write().await;

        if booking.status.is_active() && tables.slot_holder(&booking).is_some() {
            debug!(
                "Rejecting booking for dietitian {} on {} at {}: slot taken",
                booking.dietitian, booking.date, booking.time_slot.start
            );
            return Err(StoreError::SlotTaken);
        }

        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn save_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.bookings.contains_key(&booking.id) {
            return Err(StoreError::NotFound(format!("booking {}", booking.id)));
        }
        if booking.status.is_active() && tables.slot_holder(&booking).is_some() {
            return Err(StoreError::SlotTaken);
        }

        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }
}
