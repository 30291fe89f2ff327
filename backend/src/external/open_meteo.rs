//! Open-Meteo API client for weather and air quality data
//!
//! Free, keyless API. Provides current conditions, a daily weather forecast
//! and an hourly air quality forecast, which is aggregated to daily means.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{round_to, AirQualityDay, CurrentAirQuality, CurrentWeather, DataSource, WeatherDay};

use crate::error::{AppError, AppResult};

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    weather_base_url: String,
    air_quality_base_url: String,
    timeout: Duration,
}

/// Open-Meteo response for current weather
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    current: CurrentWeatherFields,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentWeatherFields {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
    weather_code: Option<u32>,
}

/// Open-Meteo response for current air quality
#[derive(Debug, Deserialize)]
struct CurrentAirQualityResponse {
    #[serde(default)]
    current: CurrentAirQualityFields,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentAirQualityFields {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    us_aqi: Option<f64>,
}

/// Open-Meteo response for the daily forecast
#[derive(Debug, Deserialize)]
struct DailyForecastResponse {
    daily: DailyForecastFields,
}

#[derive(Debug, Deserialize)]
struct DailyForecastFields {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

/// Open-Meteo response for the hourly air quality forecast
#[derive(Debug, Deserialize)]
struct HourlyAirQualityResponse {
    hourly: HourlyAirQualityFields,
}

#[derive(Debug, Deserialize)]
struct HourlyAirQualityFields {
    time: Vec<String>,
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    us_aqi: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient
    ///
    /// Base URLs are configurable so tests can point at a local server.
    pub fn new(weather_base_url: String, air_quality_base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            weather_base_url,
            air_quality_base_url,
            timeout,
        }
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> AppResult<CurrentWeather> {
        let url = format!("{}/forecast", self.weather_base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code".to_string(),
            ),
            ("timezone", "auto".to_string()),
        ];

        let data: CurrentWeatherResponse = self.get_json(&url, &query).await?;
        Ok(convert_current_weather(data.current))
    }

    /// Fetch current PM2.5, PM10 and US AQI by GPS coordinates
    pub async fn current_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<CurrentAirQuality> {
        let url = format!("{}/air-quality", self.air_quality_base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", "pm2_5,pm10,us_aqi".to_string()),
        ];

        let data: CurrentAirQualityResponse = self.get_json(&url, &query).await?;
        convert_current_air_quality(data.current).ok_or_else(|| {
            AppError::Upstream("Open-Meteo returned no air quality readings".to_string())
        })
    }

    /// Fetch a daily weather forecast of up to `days` days
    pub async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: usize,
    ) -> AppResult<Vec<WeatherDay>> {
        let url = format!("{}/forecast", self.weather_base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_probability_max,wind_speed_10m_max"
                    .to_string(),
            ),
            ("timezone", "auto".to_string()),
            ("forecast_days", days.to_string()),
        ];

        let data: DailyForecastResponse = self.get_json(&url, &query).await?;
        Ok(convert_daily_forecast(data.daily, days))
    }

    /// Fetch an hourly air quality forecast, aggregated to daily means
    ///
    /// Empty when the response carries no pollutant readings at all.
    pub async fn air_quality_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: usize,
    ) -> AppResult<Vec<AirQualityDay>> {
        let url = format!("{}/air-quality", self.air_quality_base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", "pm2_5,pm10,us_aqi".to_string()),
            ("forecast_days", days.to_string()),
        ];

        let data: HourlyAirQualityResponse = self.get_json(&url, &query).await?;
        Ok(aggregate_hourly_air_quality(data.hourly, days))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Open-Meteo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Open-Meteo error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse Open-Meteo response: {}", e)))
    }
}

/// Human-readable description of a WMO weather interpretation code
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        80 => "slight rain showers",
        95 => "thunderstorm",
        96 => "thunderstorm with hail",
        _ => "unknown",
    }
}

fn convert_current_weather(data: CurrentWeatherFields) -> CurrentWeather {
    CurrentWeather {
        temperature: round_to(data.temperature_2m.unwrap_or(30.0), 1),
        humidity: round_to(data.relative_humidity_2m.unwrap_or(50.0), 1),
        wind_speed: round_to(data.wind_speed_10m.unwrap_or(5.0), 1),
        description: describe_weather_code(data.weather_code.unwrap_or(0)).to_string(),
        source: DataSource::Live,
    }
}

/// `None` when every reading is missing
fn convert_current_air_quality(data: CurrentAirQualityFields) -> Option<CurrentAirQuality> {
    if data.pm2_5.is_none() && data.pm10.is_none() && data.us_aqi.is_none() {
        return None;
    }

    Some(CurrentAirQuality {
        pm25: round_to(data.pm2_5.unwrap_or(25.0), 1),
        pm10: round_to(data.pm10.unwrap_or(50.0), 1),
        aqi: data.us_aqi.unwrap_or(50.0).max(0.0) as u32,
        source: DataSource::Live,
    })
}

fn convert_daily_forecast(data: DailyForecastFields, days: usize) -> Vec<WeatherDay> {
    let value = |series: &[Option<f64>], i: usize, fallback: f64| {
        series.get(i).copied().flatten().unwrap_or(fallback)
    };

    data.time
        .iter()
        .take(days)
        .enumerate()
        .map(|(i, date)| WeatherDay {
            date: *date,
            temp_max: value(&data.temperature_2m_max, i, 35.0),
            temp_min: value(&data.temperature_2m_min, i, 20.0),
            rain_probability: value(&data.precipitation_probability_max, i, 0.0),
            wind_max: value(&data.wind_speed_10m_max, i, 10.0),
        })
        .collect()
}

#[derive(Default)]
struct DailyAccumulator {
    pm25: Vec<f64>,
    pm10: Vec<f64>,
    aqi: Vec<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn aggregate_hourly_air_quality(data: HourlyAirQualityFields, days: usize) -> Vec<AirQualityDay> {
    let mut daily: BTreeMap<NaiveDate, DailyAccumulator> = BTreeMap::new();
    let mut any_reading = false;

    for (i, timestamp) in data.time.iter().enumerate() {
        let Some(date) = timestamp
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        let entry = daily.entry(date).or_default();
        if let Some(v) = data.pm2_5.get(i).copied().flatten() {
            entry.pm25.push(v);
        }
        if let Some(v) = data.pm10.get(i).copied().flatten() {
            entry.pm10.push(v);
        }
        if let Some(v) = data.us_aqi.get(i).copied().flatten() {
            entry.aqi.push(v);
        }
        any_reading |= !(entry.pm25.is_empty() && entry.pm10.is_empty() && entry.aqi.is_empty());
    }

    if !any_reading {
        return Vec::new();
    }

    daily
        .into_iter()
        .take(days)
        .map(|(date, acc)| AirQualityDay {
            date,
            pm25: mean(&acc.pm25).map(|v| round_to(v, 1)).unwrap_or(shared::DEFAULT_FORECAST_PM25),
            pm10: mean(&acc.pm10).map(|v| round_to(v, 1)).unwrap_or(shared::DEFAULT_FORECAST_PM10),
            aqi: mean(&acc.aqi)
                .map(|v| v.max(0.0) as u32)
                .unwrap_or(shared::DEFAULT_FORECAST_AQI),
        })
        .collect()
}
