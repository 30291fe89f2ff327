//! Business logic services

pub mod dust;
pub mod environment;

pub use dust::{CleaningScheduleRequest, DustForecast, DustService};
pub use environment::EnvironmentService;
