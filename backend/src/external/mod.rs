//! External API integrations

pub mod estimate;
pub mod open_meteo;
pub mod openweather;

pub use estimate::Estimator;
pub use open_meteo::OpenMeteoClient;
pub use openweather::OpenWeatherClient;
