//! Shared types and computation kernel for the PV soiling platform
//!
//! This crate contains the pure soiling model, forecast projection and
//! cleaning schedule optimizer shared between the backend, the browser
//! dashboard (via WASM), and other components of the system. Nothing in
//! here performs I/O or reads the clock.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
