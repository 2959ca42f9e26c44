use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dietitian::DietitianInfo;
use crate::time::ClockTime;
use crate::user::UserInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    /// Active bookings occupy their slot; completed and cancelled ones free it.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown booking status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationType {
    Chat,
    Video,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user: Uuid,
    pub dietitian: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: BookingStatus,
    #[serde(default)]
    pub consultation_type: ConsultationType,
    pub notes: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new_pending(
        user: Uuid,
        dietitian: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
        consultation_type: ConsultationType,
        notes: Option<String>,
        goals: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user,
            dietitian,
            date,
            time_slot,
            status: BookingStatus::Pending,
            consultation_type,
            notes,
            goals,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn occupies(&self, dietitian: Uuid, date: NaiveDate, start: ClockTime) -> bool {
        self.status.is_active()
            && self.dietitian == dietitian
            && self.date == date
            && self.time_slot.start == start
    }
}

/// A booking joined with display fields of its dietitian and user at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietitian_info: Option<DietitianInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl BookingView {
    pub fn new(booking: Booking) -> Self {
        Self {
            booking,
            dietitian_info: None,
            user_info: None,
        }
    }

    pub fn with_dietitian(mut self, dietitian: Option<DietitianInfo>) -> Self {
        self.dietitian_info = dietitian;
        self
    }

    pub fn with_user(mut self, user: Option<UserInfo>) -> Self {
        self.user_info = user;
        self
    }
}
