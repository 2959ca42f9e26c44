pub mod auth;
pub mod booking;
pub mod dietitian;
pub mod error;
pub mod time;
pub mod user;
