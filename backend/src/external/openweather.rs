//! OpenWeatherMap API client
//!
//! Secondary source for current conditions, consulted only when an API key
//! is configured and Open-Meteo could not be reached.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::{round_to, CurrentWeather, DataSource};

use crate::error::{AppError, AppResult};

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    wind: OWMWind,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    /// Metres per second with `units=metric`
    speed: f64,
}

impl OpenWeatherClient {
    /// Create a new OpenWeatherClient with a configurable base URL
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            timeout,
        }
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> AppResult<CurrentWeather> {
        let url = format!("{}/weather", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("OpenWeatherMap request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "OpenWeatherMap error: {}",
                status
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::Upstream(format!("Failed to parse OpenWeatherMap response: {}", e))
        })?;

        Ok(convert_current_response(data))
    }
}

fn convert_current_response(data: OWMCurrentResponse) -> CurrentWeather {
    CurrentWeather {
        temperature: round_to(data.main.temp, 1),
        humidity: round_to(data.main.humidity, 1),
        wind_speed: round_to(data.wind.speed * 3.6, 1),
        description: data
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        source: DataSource::Live,
    }
}
