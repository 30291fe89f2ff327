//! Location-aware fallback estimates for environmental data
//!
//! Used when a provider is unreachable. Every estimate is drawn from a
//! `StdRng` seeded from an explicit seed, the location and the data kind, so
//! a fixed seed always reproduces the same numbers.

use chrono::{Datelike, Duration, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{round_to, AirQualityDay, CurrentAirQuality, CurrentWeather, DataSource, WeatherDay};

const DESCRIPTIONS: [&str; 4] = ["clear sky", "partly cloudy", "haze", "overcast"];

/// Data kinds, mixed into the seed so each draws an independent stream
#[derive(Debug, Clone, Copy)]
enum Stream {
    CurrentWeather = 1,
    CurrentAirQuality = 7,
    WeatherForecast = 13,
    AirQualityForecast = 29,
}

/// Deterministic estimator for missing environmental data
#[derive(Debug, Clone, Copy)]
pub struct Estimator {
    seed: u64,
}

impl Estimator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, stream: Stream, latitude: f64, longitude: f64) -> StdRng {
        let location = latitude.to_bits().rotate_left(17) ^ longitude.to_bits();
        let mixed = self
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(stream as u64)
            ^ location;
        StdRng::seed_from_u64(mixed)
    }

    /// Current weather from latitude and season
    pub fn current_weather(&self, latitude: f64, longitude: f64, today: NaiveDate) -> CurrentWeather {
        let mut rng = self.rng(Stream::CurrentWeather, latitude, longitude);

        let northern = latitude > 0.0;
        let mut base_temp = 35.0 - latitude.abs() * 0.5;
        match today.month() {
            12 | 1 | 2 => base_temp -= if northern { 8.0 } else { -3.0 },
            6..=8 => base_temp += if northern { 5.0 } else { -5.0 },
            _ => {}
        }

        CurrentWeather {
            temperature: round_to(base_temp + rng.random_range(-3.0..3.0), 1),
            humidity: round_to(40.0 + rng.random_range(0.0..35.0), 1),
            wind_speed: round_to(3.0 + rng.random_range(0.0..12.0), 1),
            description: DESCRIPTIONS[rng.random_range(0..DESCRIPTIONS.len())].to_string(),
            source: DataSource::Estimated,
        }
    }

    /// Current air quality; lower latitudes are assumed dustier
    pub fn current_air_quality(&self, latitude: f64, longitude: f64) -> CurrentAirQuality {
        let mut rng = self.rng(Stream::CurrentAirQuality, latitude, longitude);
        let (pm25, pm10, aqi) = draw_air_quality(&mut rng, latitude);

        CurrentAirQuality {
            pm25,
            pm10,
            aqi,
            source: DataSource::Estimated,
        }
    }

    /// Daily weather forecast starting today
    pub fn weather_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
        days: usize,
    ) -> Vec<WeatherDay> {
        let mut rng = self.rng(Stream::WeatherForecast, latitude, longitude);

        (0..days)
            .map(|i| WeatherDay {
                date: today + Duration::days(i as i64),
                temp_max: round_to(30.0 + rng.random_range(-5.0..10.0), 1),
                temp_min: round_to(18.0 + rng.random_range(-3.0..5.0), 1),
                rain_probability: rng.random_range(0.0..60.0_f64).floor(),
                wind_max: round_to(5.0 + rng.random_range(0.0..20.0), 1),
            })
            .collect()
    }

    /// Daily air quality forecast starting today
    pub fn air_quality_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
        days: usize,
    ) -> Vec<AirQualityDay> {
        let mut rng = self.rng(Stream::AirQualityForecast, latitude, longitude);

        (0..days)
            .map(|i| {
                let (pm25, pm10, aqi) = draw_air_quality(&mut rng, latitude);
                AirQualityDay {
                    date: today + Duration::days(i as i64),
                    pm25,
                    pm10,
                    aqi,
                }
            })
            .collect()
    }
}

fn draw_air_quality(rng: &mut StdRng, latitude: f64) -> (f64, f64, u32) {
    let base_aqi = if latitude.abs() > 35.0 { 60.0 } else { 90.0 };
    let aqi = (base_aqi + rng.random_range(0.0..80.0_f64)) as u32;
    let pm25 = round_to(15.0 + rng.random_range(0.0..50.0), 1);
    let pm10 = round_to(30.0 + rng.random_range(0.0..80.0), 1);
    (pm25, pm10, aqi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_same_seed_same_estimate() {
        let a = Estimator::new(42);
        let b = Estimator::new(42);
        assert_eq!(a.current_weather(31.5, 74.3, today()), b.current_weather(31.5, 74.3, today()));
        assert_eq!(a.current_air_quality(31.5, 74.3), b.current_air_quality(31.5, 74.3));
        assert_eq!(
            a.weather_forecast(31.5, 74.3, today(), 7),
            b.weather_forecast(31.5, 74.3, today(), 7)
        );
    }

    #[test]
    fn test_different_seed_changes_estimate() {
        let a = Estimator::new(1).weather_forecast(31.5, 74.3, today(), 7);
        let b = Estimator::new(2).weather_forecast(31.5, 74.3, today(), 7);
        assert_ne!(a, b);
    }

    #[test]
    fn test_current_weather_ranges() {
        for seed in 0..50 {
            let weather = Estimator::new(seed).current_weather(31.5, 74.3, today());
            // Northern winter: 35 - 15.75 - 8 = 11.25 ± 3
            assert!(weather.temperature >= 8.2 && weather.temperature <= 14.3);
            assert!(weather.humidity >= 40.0 && weather.humidity <= 75.0);
            assert!(weather.wind_speed >= 3.0 && weather.wind_speed <= 15.0);
            assert!(DESCRIPTIONS.contains(&weather.description.as_str()));
            assert_eq!(weather.source, DataSource::Estimated);
        }
    }

    #[test]
    fn test_air_quality_base_by_latitude() {
        for seed in 0..50 {
            let tropical = Estimator::new(seed).current_air_quality(24.8, 67.0);
            assert!((90..170).contains(&tropical.aqi));
            let temperate = Estimator::new(seed).current_air_quality(52.5, 13.4);
            assert!((60..140).contains(&temperate.aqi));
            assert!(temperate.pm10 >= 30.0 && temperate.pm10 <= 110.0);
        }
    }

    #[test]
    fn test_forecast_dates_start_today() {
        let days = Estimator::new(9).weather_forecast(31.5, 74.3, today(), 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, today());
        assert_eq!(days[6].date, today() + Duration::days(6));
        assert!(days.iter().all(|d| d.rain_probability >= 0.0 && d.rain_probability < 60.0));

        let air = Estimator::new(9).air_quality_forecast(31.5, 74.3, today(), 7);
        assert_eq!(air.len(), 7);
        assert_eq!(air[3].date, days[3].date);
    }
}
