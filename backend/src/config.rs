//! Configuration management for the soiling service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SOILING_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Environmental data provider configuration
    pub providers: ProviderConfig,

    /// Request defaults
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Open-Meteo forecast API base URL
    pub weather_base_url: String,

    /// Open-Meteo air quality API base URL
    pub air_quality_base_url: String,

    /// OpenWeatherMap API base URL
    pub openweather_base_url: String,

    /// OpenWeatherMap API key; the secondary weather source is skipped when unset
    pub openweather_api_key: Option<String>,

    /// Per-request timeout for Open-Meteo calls, in seconds
    pub timeout_secs: u64,

    /// Per-request timeout for OpenWeatherMap calls, in seconds
    pub openweather_timeout_secs: u64,

    /// Seed for fallback estimates; derived from the current hour when unset
    pub estimate_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    /// Days since cleaning assumed when a request omits it
    pub days_since_cleaning: u32,

    /// System capacity in kW assumed when a request omits it
    pub capacity_kw: f64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SOILING_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("providers.weather_base_url", "https://api.open-meteo.com/v1")?
            .set_default(
                "providers.air_quality_base_url",
                "https://air-quality-api.open-meteo.com/v1",
            )?
            .set_default(
                "providers.openweather_base_url",
                "https://api.openweathermap.org/data/2.5",
            )?
            .set_default("providers.timeout_secs", 8)?
            .set_default("providers.openweather_timeout_secs", 5)?
            .set_default("defaults.days_since_cleaning", 15)?
            .set_default("defaults.capacity_kw", 5.0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SOILING_ prefix)
            .add_source(
                Environment::with_prefix("SOILING")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        // An empty key in .env means "not configured"
        if config
            .providers
            .openweather_api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            config.providers.openweather_api_key = None;
        }
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            weather_base_url: "https://api.open-meteo.com/v1".to_string(),
            air_quality_base_url: "https://air-quality-api.open-meteo.com/v1".to_string(),
            openweather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            openweather_api_key: None,
            timeout_secs: 8,
            openweather_timeout_secs: 5,
            estimate_seed: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            days_since_cleaning: 15,
            capacity_kw: 5.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            providers: ProviderConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}
