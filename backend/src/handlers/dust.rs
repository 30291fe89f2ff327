//! HTTP handlers for dust monitoring endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{ApiResponse, CleaningScheduleResult, CostOverride, CurrentSoiling};
use validator::Validate;

use crate::error::AppResult;
use crate::services::{CleaningScheduleRequest, DustForecast};
use crate::AppState;

/// Query parameters shared by the current and forecast endpoints
#[derive(Debug, Deserialize)]
pub struct SoilingQuery {
    pub days_since_cleaning: Option<i64>,
}

/// Get current soiling for a location
pub async fn get_current_soiling(
    State(state): State<AppState>,
    Path((lat, lng)): Path<(f64, f64)>,
    Query(query): Query<SoilingQuery>,
) -> AppResult<Json<ApiResponse<CurrentSoiling>>> {
    let days = query
        .days_since_cleaning
        .unwrap_or_else(|| i64::from(state.config.defaults.days_since_cleaning));

    let current = state.dust.compute_current_soiling(lat, lng, days).await?;
    Ok(Json(ApiResponse::ok(current)))
}

/// Get the seven-day soiling forecast for a location
pub async fn get_soiling_forecast(
    State(state): State<AppState>,
    Path((lat, lng)): Path<(f64, f64)>,
    Query(query): Query<SoilingQuery>,
) -> AppResult<Json<ApiResponse<DustForecast>>> {
    let days = query
        .days_since_cleaning
        .unwrap_or_else(|| i64::from(state.config.defaults.days_since_cleaning));

    let forecast = state.dust.compute_forecast(lat, lng, days).await?;
    Ok(Json(ApiResponse::ok(forecast)))
}

/// Request body for the cleaning schedule endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct CleaningScheduleInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    pub days_since_cleaning: Option<i64>,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub capacity_kw: Option<f64>,
    #[validate(range(min = 0.0))]
    pub electricity_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cleaning_cost: Option<f64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
}

/// Compute a cleaning schedule with cost/benefit analysis
pub async fn create_cleaning_schedule(
    State(state): State<AppState>,
    Json(input): Json<CleaningScheduleInput>,
) -> AppResult<Json<ApiResponse<CleaningScheduleResult>>> {
    input.validate()?;
    let defaults = &state.config.defaults;

    let request = CleaningScheduleRequest {
        latitude: input.lat,
        longitude: input.lng,
        days_since_cleaning: input
            .days_since_cleaning
            .unwrap_or_else(|| i64::from(defaults.days_since_cleaning)),
        capacity_kw: input.capacity_kw.unwrap_or(defaults.capacity_kw),
        cost: CostOverride {
            electricity_rate: input.electricity_rate,
            cleaning_cost: input.cleaning_cost,
            currency: input.currency.map(|c| c.to_uppercase()),
        },
    };

    let schedule = state.dust.compute_cleaning_schedule(request).await?;
    Ok(Json(ApiResponse::ok(schedule)))
}
