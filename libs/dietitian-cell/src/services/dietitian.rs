use std::sync::Arc;

use chrono::{Utc, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{BookingFilter, BookingOrder, NutritionStore};
use shared_models::auth::CurrentUser;
use shared_models::booking::{Booking, BookingView};
use shared_models::dietitian::Dietitian;
use shared_models::user::UserInfo;
use shared_utils::state::AppState;

use crate::models::{DietitianDashboard, DietitianError, UpdateDietitianProfileRequest};

const RECENT_BOOKINGS_LIMIT: usize = 10;

pub struct DietitianService {
    store: Arc<dyn NutritionStore>,
}

impl DietitianService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_dietitians(&self) -> Result<Vec<Dietitian>, DietitianError> {
        let dietitians = self.store.list_verified_dietitians().await?;
        debug!("Listing {} verified dietitians", dietitians.len());
        Ok(dietitians)
    }

    pub async fn get_dietitian(&self, dietitian_id: Uuid) -> Result<Dietitian, DietitianError> {
        self.store
            .find_dietitian_by_id(dietitian_id)
            .await?
            .ok_or(DietitianError::NotFound)
    }

    /// Applies the fields present in `request` to the caller's own profile.
    pub async fn update_profile(
        &self,
        caller: &CurrentUser,
        request: UpdateDietitianProfileRequest,
    ) -> Result<Dietitian, DietitianError> {
        let mut dietitian = self.own_profile(caller).await?;

        if let Some(availability) = &request.availability {
            availability.validate()?;
        }
        if matches!(request.price_per_session, Some(price) if price < 0.0) {
            return Err(DietitianError::Validation(
                "pricePerSession must not be negative".to_string(),
            ));
        }
        if matches!(request.experience, Some(years) if years < 0) {
            return Err(DietitianError::Validation(
                "experience must not be negative".to_string(),
            ));
        }

        if let Some(qualifications) = request.qualifications {
            dietitian.qualifications = qualifications;
        }
        if let Some(specialization) = request.specialization {
            dietitian.specialization = specialization;
        }
        if let Some(bio) = request.bio {
            dietitian.bio = Some(bio);
        }
        if let Some(experience) = request.experience {
            dietitian.experience = Some(experience);
        }
        if let Some(availability) = request.availability {
            dietitian.availability = availability;
        }
        if let Some(price) = request.price_per_session {
            dietitian.price_per_session = price;
        }
        if let Some(image) = request.profile_image {
            dietitian.profile_image = Some(image);
        }
        dietitian.updated_at = Utc::now();

        let saved = self.store.save_dietitian(dietitian).await?;
        info!("Dietitian {} updated their profile", saved.id);
        Ok(saved)
    }

    pub async fn dashboard(&self, caller: &CurrentUser) -> Result<DietitianDashboard, DietitianError> {
        self.dashboard_as_of(caller, Utc::now().date_naive()).await
    }

    /// Dashboard with "upcoming" measured from `today`.
    pub async fn dashboard_as_of(
        &self,
        caller: &CurrentUser,
        today: NaiveDate,
    ) -> Result<DietitianDashboard, DietitianError> {
        let dietitian = self.own_profile(caller).await?;

        let upcoming = self
            .store
            .find_bookings(
                &BookingFilter::for_dietitian(dietitian.id)
                    .from_date(today)
                    .active()
                    .ordered(BookingOrder::DateAsc),
            )
            .await?;

        let recent = self
            .store
            .find_bookings(
                &BookingFilter::for_dietitian(dietitian.id)
                    .ordered(BookingOrder::CreatedDesc)
                    .limit(RECENT_BOOKINGS_LIMIT),
            )
            .await?;

        Ok(DietitianDashboard {
            upcoming_bookings: self.with_user_info(upcoming).await?,
            recent_bookings: self.with_user_info(recent).await?,
            dietitian,
        })
    }

    async fn own_profile(&self, caller: &CurrentUser) -> Result<Dietitian, DietitianError> {
        if !caller.is_dietitian() {
            warn!("User {} attempted a dietitian-only action", caller.id);
            return Err(DietitianError::NotADietitian);
        }

        self.store
            .find_dietitian_by_user(caller.id)
            .await?
            .ok_or(DietitianError::ProfileNotFound)
    }

    async fn with_user_info(&self, bookings: Vec<Booking>) -> Result<Vec<BookingView>, DietitianError> {
        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let user = self.store.find_user_by_id(booking.user).await?;
            views.push(BookingView::new(booking).with_user(user.as_ref().map(UserInfo::from)));
        }
        Ok(views)
    }
}
