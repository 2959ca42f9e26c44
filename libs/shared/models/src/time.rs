use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

static CLOCK_TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("Invalid time '{0}', expected HH:MM")]
    ClockTime(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
}

/// Wall-clock time with minute precision, always rendered as zero-padded `HH:MM`.
///
/// Parsing accepts `00:00` through `23:59` plus `24:00` as an end-of-day boundary.
/// Arithmetic never wraps and stops at `24:00`: a window starting at `23:45` ends at `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 || hour > 24 {
            return None;
        }

        let total = hour * 60 + minute;
        if total > MINUTES_PER_DAY {
            return None;
        }

        Some(Self(total))
    }

    pub fn parse(value: &str) -> Result<Self, TimeFormatError> {
        let invalid = || TimeFormatError::ClockTime(value.to_string());

        let captures = CLOCK_TIME_PATTERN
            .captures(value.trim())
            .ok_or_else(invalid)?;

        let hour: u16 = captures[1].parse().map_err(|_| invalid())?;
        let minute: u16 = captures[2].parse().map_err(|_| invalid())?;

        Self::from_hm(hour, minute).ok_or_else(invalid)
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Minute overflow rolls into the hour component. The result never passes `24:00`.
    pub fn plus_minutes(self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(MINUTES_PER_DAY))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Parses a calendar date, ignoring any time-of-day suffix (`2024-06-03T10:00:00Z`).
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, TimeFormatError> {
    let trimmed = value.trim();
    let invalid = || TimeFormatError::Date(value.to_string());

    let date_part = match trimmed.char_indices().nth(10) {
        None => trimmed,
        Some((idx, 'T')) | Some((idx, ' ')) => &trimmed[..idx],
        Some(_) => return Err(invalid()),
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())
}
