pub mod availability;
pub mod dietitian;

pub use availability::{generate_slots, AvailabilityService, SLOT_MINUTES};
pub use dietitian::DietitianService;
