//! Domain models for PV soiling prediction and cleaning schedules

mod environment;
mod forecast;
mod region;
mod schedule;
mod soiling;

pub use environment::*;
pub use forecast::*;
pub use region::*;
pub use schedule::*;
pub use soiling::*;
