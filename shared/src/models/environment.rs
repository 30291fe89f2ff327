//! Environmental observation models
//!
//! These are the shapes the Environmental Data Provider hands to the
//! soiling kernel. They are plain immutable values, produced fresh per call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DataSource;

/// Current weather and air quality at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSnapshot {
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Human-readable sky condition ("clear sky", "haze", ...)
    pub description: String,
    /// PM2.5 concentration in µg/m³
    pub pm25: f64,
    /// PM10 concentration in µg/m³
    pub pm10: f64,
    /// Composite US AQI
    pub aqi: u32,
    /// Provenance of the weather fields
    pub source: DataSource,
    /// Provenance of the air quality fields
    pub air_quality_source: DataSource,
}

impl EnvironmentalSnapshot {
    /// Assemble a snapshot from separately sourced weather and air quality
    pub fn from_parts(weather: CurrentWeather, air: CurrentAirQuality) -> Self {
        Self {
            temperature: weather.temperature,
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
            description: weather.description,
            pm25: air.pm25,
            pm10: air.pm10,
            aqi: air.aqi,
            source: weather.source,
            air_quality_source: air.source,
        }
    }

    /// Aggregate provenance of the whole snapshot
    pub fn data_source(&self) -> DataSource {
        DataSource::combine([self.source, self.air_quality_source])
    }
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub source: DataSource,
}

/// Current air quality readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAirQuality {
    pub pm25: f64,
    pub pm10: f64,
    pub aqi: u32,
    pub source: DataSource,
}

/// One day of a multi-day weather forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// Daily maximum temperature in °C
    pub temp_max: f64,
    /// Daily minimum temperature in °C
    pub temp_min: f64,
    /// Maximum precipitation probability in %
    pub rain_probability: f64,
    /// Maximum wind speed in km/h
    pub wind_max: f64,
}

/// One day of a multi-day air quality forecast (daily means)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityDay {
    pub date: NaiveDate,
    pub pm25: f64,
    pub pm10: f64,
    pub aqi: u32,
}

/// Air quality assumed for a forecast day the provider did not cover
pub const DEFAULT_FORECAST_PM25: f64 = 30.0;
pub const DEFAULT_FORECAST_PM10: f64 = 60.0;
pub const DEFAULT_FORECAST_AQI: u32 = 80;

impl AirQualityDay {
    /// Placeholder readings for a date missing from the AQI forecast
    pub fn default_for(date: NaiveDate) -> Self {
        Self {
            date,
            pm25: DEFAULT_FORECAST_PM25,
            pm10: DEFAULT_FORECAST_PM10,
            aqi: DEFAULT_FORECAST_AQI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(source: DataSource) -> CurrentWeather {
        CurrentWeather {
            temperature: 31.0,
            humidity: 48.0,
            wind_speed: 7.5,
            description: "haze".to_string(),
            source,
        }
    }

    fn air(source: DataSource) -> CurrentAirQuality {
        CurrentAirQuality {
            pm25: 42.0,
            pm10: 95.0,
            aqi: 130,
            source,
        }
    }

    #[test]
    fn test_from_parts_keeps_both_sources() {
        let snapshot =
            EnvironmentalSnapshot::from_parts(weather(DataSource::Live), air(DataSource::Estimated));
        assert_eq!(snapshot.source, DataSource::Live);
        assert_eq!(snapshot.air_quality_source, DataSource::Estimated);
        assert_eq!(snapshot.data_source(), DataSource::Estimated);
        assert_eq!(snapshot.pm10, 95.0);
        assert_eq!(snapshot.wind_speed, 7.5);
    }

    #[test]
    fn test_live_snapshot_is_live() {
        let snapshot =
            EnvironmentalSnapshot::from_parts(weather(DataSource::Live), air(DataSource::Live));
        assert_eq!(snapshot.data_source(), DataSource::Live);
    }

    #[test]
    fn test_default_air_quality_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let day = AirQualityDay::default_for(date);
        assert_eq!(day.pm25, 30.0);
        assert_eq!(day.pm10, 60.0);
        assert_eq!(day.aqi, 80);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot =
            EnvironmentalSnapshot::from_parts(weather(DataSource::Live), air(DataSource::Live));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("windSpeed").is_some());
        assert!(json.get("airQualitySource").is_some());
        assert_eq!(json["source"], "live");
    }
}
