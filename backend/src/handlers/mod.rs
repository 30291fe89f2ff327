//! HTTP request handlers

pub mod dust;
pub mod health;

pub use dust::{create_cleaning_schedule, get_current_soiling, get_soiling_forecast};
pub use health::health_check;
