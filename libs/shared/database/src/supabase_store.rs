use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::booking::{Booking, BookingStatus, ConsultationType, TimeSlot};
use shared_models::dietitian::{AvailabilityTemplate, Dietitian};
use shared_models::time::ClockTime;
use shared_models::user::UserProfile;

use crate::store::{BookingFilter, BookingOrder, NutritionStore, StoreError};
use crate::supabase::{return_representation, upsert_representation, SupabaseClient, SupabaseError};

const DIETITIANS: &str = "/rest/v1/dietitians";
const PROFILES: &str = "/rest/v1/profiles";
const BOOKINGS: &str = "/rest/v1/bookings";

#[derive(Debug, Serialize, Deserialize)]
struct DietitianRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    #[serde(default)]
    qualifications: Vec<String>,
    #[serde(default)]
    specialization: Vec<String>,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    total_reviews: i32,
    bio: Option<String>,
    experience: Option<i32>,
    #[serde(default)]
    availability: AvailabilityTemplate,
    #[serde(default)]
    price_per_session: f64,
    #[serde(default)]
    is_verified: bool,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DietitianRow> for Dietitian {
    fn from(row: DietitianRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            qualifications: row.qualifications,
            specialization: row.specialization,
            rating: row.rating,
            total_reviews: row.total_reviews,
            bio: row.bio,
            experience: row.experience,
            availability: row.availability,
            price_per_session: row.price_per_session,
            is_verified: row.is_verified,
            profile_image: row.profile_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Dietitian> for DietitianRow {
    fn from(dietitian: Dietitian) -> Self {
        Self {
            id: dietitian.id,
            user_id: dietitian.user_id,
            name: dietitian.name,
            email: dietitian.email,
            qualifications: dietitian.qualifications,
            specialization: dietitian.specialization,
            rating: dietitian.rating,
            total_reviews: dietitian.total_reviews,
            bio: dietitian.bio,
            experience: dietitian.experience,
            availability: dietitian.availability,
            price_per_session: dietitian.price_per_session,
            is_verified: dietitian.is_verified,
            profile_image: dietitian.profile_image,
            created_at: dietitian.created_at,
            updated_at: dietitian.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    #[serde(default)]
    role: Role,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    dietitian_id: Uuid,
    date: NaiveDate,
    slot_start: ClockTime,
    slot_end: ClockTime,
    status: BookingStatus,
    #[serde(default)]
    consultation_type: ConsultationType,
    notes: Option<String>,
    #[serde(default)]
    goals: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            dietitian: row.dietitian_id,
            date: row.date,
            time_slot: TimeSlot {
                start: row.slot_start,
                end: row.slot_end,
            },
            status: row.status,
            consultation_type: row.consultation_type,
            notes: row.notes,
            goals: row.goals,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Booking> for BookingRow {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user,
            dietitian_id: booking.dietitian,
            date: booking.date,
            slot_start: booking.time_slot.start,
            slot_end: booking.time_slot.end,
            status: booking.status,
            consultation_type: booking.consultation_type,
            notes: booking.notes,
            goals: booking.goals,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

fn eq(column: &str, value: impl ToString) -> (String, String) {
    (column.to_string(), format!("eq.{}", value.to_string()))
}

fn backend(err: SupabaseError) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn encode<T: Serialize>(row: &T) -> Result<Value, StoreError> {
    serde_json::to_value(row).map_err(|e| StoreError::Backend(e.to_string()))
}

/// PostgREST query parameters for a booking filter.
pub fn booking_query(filter: &BookingFilter) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];

    if let Some(user) = filter.user {
        query.push(eq("user_id", user));
    }
    if let Some(dietitian) = filter.dietitian {
        query.push(eq("dietitian_id", dietitian));
    }
    if let Some(date) = filter.date {
        query.push(eq("date", date));
    }
    if let Some(from) = filter.date_from {
        query.push(("date".to_string(), format!("gte.{}", from)));
    }
    if let Some(statuses) = &filter.statuses {
        let list: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();
        query.push(("status".to_string(), format!("in.({})", list.join(","))));
    }
    if let Some(start) = filter.slot_start {
        query.push(eq("slot_start", start));
    }

    let order = match filter.order {
        BookingOrder::DateAsc => "date.asc,slot_start.asc",
        BookingOrder::DateDesc => "date.desc,slot_start.desc",
        BookingOrder::CreatedDesc => "created_at.desc",
    };
    query.push(("order".to_string(), order.to_string()));

    if let Some(limit) = filter.limit {
        query.push(("limit".to_string(), limit.to_string()));
    }

    query
}

/// Store backed by Supabase tables `dietitians`, `profiles` and `bookings`.
///
/// Double-booking is prevented by the partial unique index on
/// `bookings (dietitian_id, date, slot_start) where status in ('pending', 'confirmed')`.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn select<R>(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<R>, StoreError>
    where
        R: DeserializeOwned,
    {
        self.supabase
            .request::<Vec<R>>(Method::GET, path, &query, None)
            .await
            .map_err(backend)
    }

    async fn select_one<R>(&self, path: &str, column: &str, value: Uuid) -> Result<Option<R>, StoreError>
    where
        R: DeserializeOwned,
    {
        let query = vec![
            ("select".to_string(), "*".to_string()),
            eq(column, value),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows: Vec<R> = self.select(path, query).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl NutritionStore for SupabaseStore {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    async fn find_dietitian_by_id(&self, id: Uuid) -> Result<Option<Dietitian>, StoreError> {
        let row: Option<DietitianRow> = self.select_one(DIETITIANS, "id", id).await?;
        Ok(row.map(Dietitian::from))
    }

    async fn find_dietitian_by_user(&self, user_id: Uuid) -> Result<Option<Dietitian>, StoreError> {
        let row: Option<DietitianRow> = self.select_one(DIETITIANS, "user_id", user_id).await?;
        Ok(row.map(Dietitian::from))
    }

    async fn list_verified_dietitians(&self) -> Result<Vec<Dietitian>, StoreError> {
        let query = vec![
            ("select".to_string(), "*".to_string()),
            eq("is_verified", true),
            ("order".to_string(), "created_at.asc".to_string()),
        ];
        let rows: Vec<DietitianRow> = self.select(DIETITIANS, query).await?;
        Ok(rows.into_iter().map(Dietitian::from).collect())
    }

    async fn save_dietitian(&self, dietitian: Dietitian) -> Result<Dietitian, StoreError> {
        debug!("Upserting dietitian {}", dietitian.id);
        let body = encode(&DietitianRow::from(dietitian))?;

        let rows: Vec<DietitianRow> = self
            .supabase
            .request_with_headers(Method::POST, DIETITIANS, &[], Some(body), Some(upsert_representation()))
            .await
            .map_err(backend)?;

        rows.into_iter()
            .next()
            .map(Dietitian::from)
            .ok_or_else(|| StoreError::Backend("Failed to save dietitian".to_string()))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let row: Option<ProfileRow> = self.select_one(PROFILES, "id", id).await?;
        Ok(row.map(UserProfile::from))
    }

    async fn find_booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = self.select_one(BOOKINGS, "id", id).await?;
        Ok(row.map(Booking::from))
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = self.select(BOOKINGS, booking_query(filter)).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn create_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        debug!("Inserting booking {} for dietitian {}", booking.id, booking.dietitian);
        let body = encode(&BookingRow::from(booking))?;

        let rows: Vec<BookingRow> = self
            .supabase
            .request_with_headers(Method::POST, BOOKINGS, &[], Some(body), Some(return_representation()))
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    warn!("Booking insert rejected by unique slot index");
                    StoreError::SlotTaken
                } else {
                    backend(err)
                }
            })?;

        rows.into_iter()
            .next()
            .map(Booking::from)
            .ok_or_else(|| StoreError::Backend("Failed to create booking".to_string()))
    }

    async fn save_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let id = booking.id;
        let body = encode(&BookingRow::from(booking))?;

        let rows: Vec<BookingRow> = self
            .supabase
            .request_with_headers(Method::PATCH, BOOKINGS, &[eq("id", id)], Some(body), Some(return_representation()))
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    StoreError::SlotTaken
                } else {
                    backend(err)
                }
            })?;

        rows.into_iter()
            .next()
            .map(Booking::from)
            .ok_or_else(|| StoreError::NotFound(format!("booking {}", id)))
    }
}
