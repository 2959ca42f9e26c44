use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{ClockTime, TimeFormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn of_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        write!(f, "{}", name)
    }
}

fn default_true() -> bool {
    true
}

/// One recurring weekday window. Times are kept as submitted and parsed on use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl AvailabilityRule {
    pub fn new(day: DayOfWeek, start_time: &str, end_time: &str, is_available: bool) -> Self {
        Self {
            day,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            is_available,
        }
    }

    pub fn window(&self) -> Result<(ClockTime, ClockTime), TimeFormatError> {
        Ok((
            ClockTime::parse(&self.start_time)?,
            ClockTime::parse(&self.end_time)?,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityTemplate {
    /// Label only; slots are computed in naive local time.
    pub timezone: Option<String>,
    #[serde(default)]
    pub slots: Vec<AvailabilityRule>,
}

impl AvailabilityTemplate {
    /// When several rules share a weekday the first one wins.
    pub fn rule_for(&self, day: DayOfWeek) -> Option<&AvailabilityRule> {
        self.slots.iter().find(|rule| rule.day == day)
    }

    pub fn validate(&self) -> Result<(), TimeFormatError> {
        for rule in &self.slots {
            rule.window()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dietitian {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub specialization: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub total_reviews: i32,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    #[serde(default)]
    pub availability: AvailabilityTemplate,
    #[serde(default)]
    pub price_per_session: f64,
    #[serde(default)]
    pub is_verified: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dietitian {
    pub fn new(user_id: Uuid, name: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            qualifications: Vec::new(),
            specialization: Vec::new(),
            rating: 0.0,
            total_reviews: 0,
            bio: None,
            experience: None,
            availability: AvailabilityTemplate::default(),
            price_per_session: 0.0,
            is_verified: false,
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Display fields joined onto bookings at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietitianInfo {
    pub id: Uuid,
    pub name: String,
    pub qualifications: Vec<String>,
    pub rating: f32,
    pub specialization: Vec<String>,
    pub profile_image: Option<String>,
}

impl From<&Dietitian> for DietitianInfo {
    fn from(dietitian: &Dietitian) -> Self {
        Self {
            id: dietitian.id,
            name: dietitian.name.clone(),
            qualifications: dietitian.qualifications.clone(),
            rating: dietitian.rating,
            specialization: dietitian.specialization.clone(),
            profile_image: dietitian.profile_image.clone(),
        }
    }
}
