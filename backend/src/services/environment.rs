//! Environmental data service
//!
//! Fetches current conditions and daily forecasts for a location. Every
//! method returns usable data: a provider failure is logged and replaced by a
//! seeded estimate, tagged [`DataSource::Estimated`].

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use shared::{
    AirQualityDay, CurrentAirQuality, CurrentWeather, DataSource, EnvironmentalSnapshot,
    WeatherDay,
};

use crate::config::ProviderConfig;
use crate::external::{Estimator, OpenMeteoClient, OpenWeatherClient};

/// A value together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            source: DataSource::Live,
        }
    }

    pub fn estimated(value: T) -> Self {
        Self {
            value,
            source: DataSource::Estimated,
        }
    }
}

/// Environmental data service with provider fallback
#[derive(Clone)]
pub struct EnvironmentService {
    open_meteo: OpenMeteoClient,
    openweather: Option<OpenWeatherClient>,
    estimate_seed: Option<u64>,
}

impl EnvironmentService {
    /// Create a new EnvironmentService from provider configuration
    pub fn new(config: &ProviderConfig) -> Self {
        let open_meteo = OpenMeteoClient::new(
            config.weather_base_url.clone(),
            config.air_quality_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        );

        let openweather = config.openweather_api_key.clone().map(|key| {
            OpenWeatherClient::new(
                key,
                config.openweather_base_url.clone(),
                Duration::from_secs(config.openweather_timeout_secs),
            )
        });

        Self {
            open_meteo,
            openweather,
            estimate_seed: config.estimate_seed,
        }
    }

    fn estimator(&self) -> Estimator {
        Estimator::new(self.estimate_seed.unwrap_or_else(current_hour_seed))
    }

    /// Current weather and air quality, fetched concurrently
    pub async fn current_snapshot(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
    ) -> Sourced<EnvironmentalSnapshot> {
        let (weather, air) = tokio::join!(
            self.current_weather(latitude, longitude, today),
            self.current_air_quality(latitude, longitude),
        );

        let snapshot = EnvironmentalSnapshot::from_parts(weather, air);
        Sourced {
            source: snapshot.data_source(),
            value: snapshot,
        }
    }

    async fn current_weather(&self, latitude: f64, longitude: f64, today: NaiveDate) -> CurrentWeather {
        let open_meteo_error = match self.open_meteo.current_weather(latitude, longitude).await {
            Ok(weather) => return weather,
            Err(e) => e,
        };

        if let Some(openweather) = &self.openweather {
            tracing::warn!(
                "Open-Meteo current weather unavailable ({}), trying OpenWeatherMap",
                open_meteo_error
            );
            match openweather.current_weather(latitude, longitude).await {
                Ok(weather) => return weather,
                Err(e) => tracing::warn!("OpenWeatherMap unavailable ({}), using estimate", e),
            }
        } else {
            tracing::warn!(
                "Current weather unavailable ({}), using estimate",
                open_meteo_error
            );
        }

        self.estimator().current_weather(latitude, longitude, today)
    }

    async fn current_air_quality(&self, latitude: f64, longitude: f64) -> CurrentAirQuality {
        match self.open_meteo.current_air_quality(latitude, longitude).await {
            Ok(air) => air,
            Err(e) => {
                tracing::warn!("Current air quality unavailable ({}), using estimate", e);
                self.estimator().current_air_quality(latitude, longitude)
            }
        }
    }

    /// Daily weather forecast of `days` days starting today
    pub async fn weather_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
        days: usize,
    ) -> Sourced<Vec<WeatherDay>> {
        match self.open_meteo.daily_forecast(latitude, longitude, days).await {
            Ok(forecast) if !forecast.is_empty() => Sourced::live(forecast),
            Ok(_) => {
                tracing::warn!("Weather forecast returned no days, using estimate");
                Sourced::estimated(self.estimator().weather_forecast(latitude, longitude, today, days))
            }
            Err(e) => {
                tracing::warn!("Weather forecast unavailable ({}), using estimate", e);
                Sourced::estimated(self.estimator().weather_forecast(latitude, longitude, today, days))
            }
        }
    }

    /// Daily air quality forecast of `days` days starting today
    pub async fn air_quality_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
        days: usize,
    ) -> Sourced<Vec<AirQualityDay>> {
        match self.open_meteo.air_quality_forecast(latitude, longitude, days).await {
            Ok(forecast) if !forecast.is_empty() => Sourced::live(forecast),
            Ok(_) => {
                tracing::warn!("Air quality forecast returned no readings, using estimate");
                Sourced::estimated(
                    self.estimator()
                        .air_quality_forecast(latitude, longitude, today, days),
                )
            }
            Err(e) => {
                tracing::warn!("Air quality forecast unavailable ({}), using estimate", e);
                Sourced::estimated(
                    self.estimator()
                        .air_quality_forecast(latitude, longitude, today, days),
                )
            }
        }
    }
}

/// Seed that changes once per hour, so unseeded estimates stay stable
/// within the hour
fn current_hour_seed() -> u64 {
    (Utc::now().timestamp() / 3600).unsigned_abs()
}
