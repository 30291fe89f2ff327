//! Route definitions for the dust monitoring API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/dust", dust_routes())
}

/// Soiling and cleaning schedule routes
fn dust_routes() -> Router<AppState> {
    Router::new()
        .route("/current/:lat/:lng", get(handlers::get_current_soiling))
        .route("/forecast/:lat/:lng", get(handlers::get_soiling_forecast))
        .route("/cleaning-schedule", post(handlers::create_cleaning_schedule))
}
