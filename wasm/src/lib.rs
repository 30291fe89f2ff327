//! WebAssembly module for the Solar Soiling Platform
//!
//! Provides client-side computation for:
//! - Soiling estimates from manually entered readings
//! - Region profile lookup
//! - Cleaning urgency and cost defaults
//!
//! Structured results are returned as JSON strings in the same camelCase
//! shape the HTTP API uses.

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Run the soiling model on a single set of readings
#[wasm_bindgen]
pub fn calculate_soiling(
    days_since_cleaning: u32,
    pm10: f64,
    aqi: f64,
    humidity: f64,
    wind_speed: f64,
    region_type: &str,
    season: &str,
) -> Result<String, JsValue> {
    let region_type: RegionType = region_type.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let season: Season = season.parse().map_err(|e: String| JsValue::from_str(&e))?;

    let inputs = SoilingInputs {
        pm10,
        aqi,
        humidity,
        wind_speed,
    };
    to_json(&compute_soiling(days_since_cleaning, &inputs, region_type, season))
}

/// Season and region type for a location in a given month (1-12)
#[wasm_bindgen]
pub fn resolve_region_profile(lat: f64, lng: f64, month: u32) -> Result<String, JsValue> {
    to_json(&RegionProfile::resolve(lat, lng, month))
}

/// Season and region type for a location this month, by the browser clock
#[wasm_bindgen]
pub fn current_region_profile(lat: f64, lng: f64) -> Result<String, JsValue> {
    let month = js_sys::Date::new_0().get_utc_month() + 1;
    resolve_region_profile(lat, lng, month)
}

/// Equivalent full-sun hours per day at a latitude
#[wasm_bindgen]
pub fn peak_sun_hours(lat: f64) -> f64 {
    shared::peak_sun_hours(lat)
}

/// Urgency tier ("low", "medium", "high") for a loss and cleaning age
#[wasm_bindgen]
pub fn classify_cleaning_urgency(efficiency_loss: f64, days_since_cleaning: u32) -> String {
    urgency_tier(efficiency_loss, days_since_cleaning).to_string()
}

/// Regional tariff and cleaning cost defaults for a location
#[wasm_bindgen]
pub fn resolve_cost_model(lat: f64, lng: f64) -> Result<String, JsValue> {
    to_json(&CostModel::regional_default(lat, lng))
}
