use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use chrono::NaiveDate;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{InMemoryStore, NutritionStore};
use shared_models::auth::{CurrentUser, Role};
use shared_models::dietitian::{AvailabilityRule, AvailabilityTemplate, Dietitian, DayOfWeek};
use shared_models::user::UserProfile;

use crate::extractor::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::state::AppState;

/// Monday, 3 June 2024.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(name: &str, email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn client(email: &str) -> Self {
        Self::new("Test Client", email, Role::User)
    }

    pub fn dietitian(email: &str) -> Self {
        Self::new("Dr. Test Dietitian", email, Role::Dietitian)
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser::new(self.id, self.role)
    }

    pub fn identity_headers(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from_str(&self.role.to_string()).unwrap(),
            ),
        ]
    }
}

/// In-memory store plus the state handlers expect, for seeding scenarios.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(AppConfig::in_memory(), store.clone());
        Self { store, state }
    }

    pub async fn seed_client(&self, email: &str) -> TestUser {
        let user = TestUser::client(email);
        self.store.insert_user(user.to_profile()).await;
        user
    }

    /// Seeds a verified dietitian owned by a new dietitian-role user.
    pub async fn seed_dietitian(&self, rules: Vec<AvailabilityRule>) -> (TestUser, Dietitian) {
        let owner = TestUser::dietitian(&format!("dietitian-{}@example.com", Uuid::new_v4()));
        self.store.insert_user(owner.to_profile()).await;

        let mut dietitian = Dietitian::new(owner.id, &owner.name, &owner.email);
        dietitian.qualifications = vec!["RD".to_string(), "MSc Nutrition".to_string()];
        dietitian.specialization = vec!["weight_loss".to_string()];
        dietitian.rating = 4.5;
        dietitian.is_verified = true;
        dietitian.availability = AvailabilityTemplate {
            timezone: Some("UTC".to_string()),
            slots: rules,
        };

        let dietitian = self.store.save_dietitian(dietitian).await.unwrap();
        (owner, dietitian)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn monday_rule(start: &str, end: &str) -> AvailabilityRule {
    AvailabilityRule::new(DayOfWeek::Monday, start, end, true)
}
