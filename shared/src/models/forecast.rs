//! Day-by-day soiling forecast
//!
//! Applies the soiling model to each day of a weather + air quality
//! forecast, with rain treated as partial natural cleaning.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::environment::{AirQualityDay, WeatherDay};
use super::region::RegionProfile;
use super::soiling::{compute_soiling, SoilingInputs};

/// Number of days projected ahead
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Rain probability (%) above which panels are assumed to be rinsed
pub const RAIN_LIKELY_THRESHOLD: f64 = 50.0;

/// Share of accumulated dirty days that survive a rain event
const RAIN_RETENTION: f64 = 0.6;

/// Cleaning-day limits
const MAX_CLEANING_WIND: f64 = 25.0;
const MAX_CLEANING_AQI: u32 = 120;

/// Whether a forecast day is suitable for cleaning
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    GoodDayToClean,
    Wait,
}

/// Projected soiling for one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub dust_level: f64,
    pub efficiency_loss: f64,
    /// Rain likely enough to rinse the panels
    pub rain: bool,
    pub rain_probability: f64,
    pub wind_max: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub aqi: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub recommendation: Recommendation,
}

impl ForecastDay {
    pub fn is_good_day(&self) -> bool {
        self.recommendation == Recommendation::GoodDayToClean
    }
}

pub fn is_rain_likely(rain_probability: f64) -> bool {
    rain_probability > RAIN_LIKELY_THRESHOLD
}

/// Days of accumulation the model should see for forecast day `day_index`
///
/// Likely rain keeps 60% of the accumulation, floored at one day, even for
/// a panel cleaned today.
pub fn effective_days(days_since_cleaning: u32, day_index: u32, rain_probability: f64) -> u32 {
    let days = days_since_cleaning.saturating_add(day_index);
    if is_rain_likely(rain_probability) {
        let dampened = (f64::from(days) * RAIN_RETENTION).floor() as u32;
        dampened.max(1)
    } else {
        days
    }
}

/// Humidity surrogate from the daily maximum temperature and rain chance
pub fn estimate_humidity(temp_max: f64, rain_probability: f64) -> f64 {
    (65.0 - (temp_max - 25.0) * 0.8 + rain_probability * 0.3).clamp(25.0, 95.0)
}

/// Mean wind surrogate from the daily maximum
pub fn estimate_mean_wind(wind_max: f64) -> f64 {
    wind_max * 0.6
}

/// No rain, moderate wind, tolerable air
pub fn is_good_cleaning_day(weather: &WeatherDay, air: &AirQualityDay) -> bool {
    !is_rain_likely(weather.rain_probability)
        && weather.wind_max < MAX_CLEANING_WIND
        && air.aqi < MAX_CLEANING_AQI
}

/// Project soiling over the forecast horizon
///
/// One entry per weather day, in order, truncated to
/// [`FORECAST_HORIZON_DAYS`]. Air quality is aligned by date; dates the AQI
/// forecast does not cover fall back to [`AirQualityDay::default_for`].
pub fn project_forecast(
    weather: &[WeatherDay],
    air_quality: &[AirQualityDay],
    days_since_cleaning: u32,
    profile: &RegionProfile,
) -> Vec<ForecastDay> {
    let air_by_date: HashMap<NaiveDate, &AirQualityDay> =
        air_quality.iter().map(|a| (a.date, a)).collect();

    weather
        .iter()
        .take(FORECAST_HORIZON_DAYS)
        .enumerate()
        .map(|(index, day)| {
            let air = air_by_date
                .get(&day.date)
                .map(|a| (*a).clone())
                .unwrap_or_else(|| AirQualityDay::default_for(day.date));
            project_day(day, &air, index as u32, days_since_cleaning, profile)
        })
        .collect()
}

fn project_day(
    weather: &WeatherDay,
    air: &AirQualityDay,
    day_index: u32,
    days_since_cleaning: u32,
    profile: &RegionProfile,
) -> ForecastDay {
    let days = effective_days(days_since_cleaning, day_index, weather.rain_probability);
    let inputs = SoilingInputs {
        pm10: air.pm10,
        aqi: f64::from(air.aqi),
        humidity: estimate_humidity(weather.temp_max, weather.rain_probability),
        wind_speed: estimate_mean_wind(weather.wind_max),
    };
    let soiling = compute_soiling(days, &inputs, profile.region_type, profile.season);

    let recommendation = if is_good_cleaning_day(weather, air) {
        Recommendation::GoodDayToClean
    } else {
        Recommendation::Wait
    };

    ForecastDay {
        date: weather.date,
        dust_level: soiling.dust_level,
        efficiency_loss: soiling.efficiency_loss,
        rain: is_rain_likely(weather.rain_probability),
        rain_probability: weather.rain_probability,
        wind_max: weather.wind_max,
        temp_max: weather.temp_max,
        temp_min: weather.temp_min,
        aqi: air.aqi,
        pm25: air.pm25,
        pm10: air.pm10,
        recommendation,
    }
}
