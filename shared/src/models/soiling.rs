//! PV soiling model
//!
//! Converts one environmental observation, a region profile and the number of
//! days since the panels were last cleaned into an efficiency loss estimate.
//!
//! The daily soiling rate is a product of six independent multipliers:
//!
//! ```text
//! rate = base(region) * pm10 * aqi * humidity * wind * season
//! ```
//!
//! clamped to [`MIN_DAILY_RATE`, `MAX_DAILY_RATE`]. Accumulation saturates:
//!
//! ```text
//! loss = MAX_LOSS * (1 - exp(-rate * days / MAX_LOSS))
//! ```

use serde::{Deserialize, Serialize};

use super::environment::EnvironmentalSnapshot;
use super::region::{RegionProfile, RegionType, Season};
use crate::types::{round_to, DataSource};

/// Saturation ceiling for efficiency loss, in %
pub const MAX_LOSS: f64 = 40.0;
/// Lower clamp for the daily soiling rate, in %/day
pub const MIN_DAILY_RATE: f64 = 0.02;
/// Upper clamp for the daily soiling rate, in %/day
pub const MAX_DAILY_RATE: f64 = 2.5;

/// The four readings the soiling model actually consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilingInputs {
    /// PM10 in µg/m³
    pub pm10: f64,
    /// Composite AQI
    pub aqi: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Mean wind speed in km/h
    pub wind_speed: f64,
}

impl Default for SoilingInputs {
    fn default() -> Self {
        Self {
            pm10: 50.0,
            aqi: 80.0,
            humidity: 50.0,
            wind_speed: 5.0,
        }
    }
}

impl SoilingInputs {
    /// Replace non-finite readings with the neutral defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        Self {
            pm10: pick(self.pm10, defaults.pm10),
            aqi: pick(self.aqi, defaults.aqi),
            humidity: pick(self.humidity, defaults.humidity),
            wind_speed: pick(self.wind_speed, defaults.wind_speed),
        }
    }
}

impl From<&EnvironmentalSnapshot> for SoilingInputs {
    fn from(snapshot: &EnvironmentalSnapshot) -> Self {
        Self {
            pm10: snapshot.pm10,
            aqi: f64::from(snapshot.aqi),
            humidity: snapshot.humidity,
            wind_speed: snapshot.wind_speed,
        }
    }
}

/// The six multiplicative contributors behind a daily soiling rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilingFactors {
    pub base_rate: f64,
    pub pm10_factor: f64,
    pub aqi_factor: f64,
    pub humidity_factor: f64,
    pub wind_factor: f64,
    pub season_factor: f64,
}

impl SoilingFactors {
    /// Compute all factors for a set of readings
    pub fn compute(inputs: &SoilingInputs, region_type: RegionType, season: Season) -> Self {
        Self {
            base_rate: base_rate(region_type),
            pm10_factor: pm10_factor(inputs.pm10),
            aqi_factor: aqi_factor(inputs.aqi),
            humidity_factor: humidity_factor(inputs.humidity),
            wind_factor: wind_factor(inputs.wind_speed),
            season_factor: season_factor(season),
        }
    }

    /// Unclamped product of all factors
    pub fn product(&self) -> f64 {
        self.base_rate
            * self.pm10_factor
            * self.aqi_factor
            * self.humidity_factor
            * self.wind_factor
            * self.season_factor
    }

    /// Daily soiling rate, clamped to the realistic range
    pub fn daily_rate(&self) -> f64 {
        self.product().clamp(MIN_DAILY_RATE, MAX_DAILY_RATE)
    }

    fn rounded(&self) -> Self {
        Self {
            base_rate: round_to(self.base_rate, 3),
            pm10_factor: round_to(self.pm10_factor, 2),
            aqi_factor: round_to(self.aqi_factor, 2),
            humidity_factor: round_to(self.humidity_factor, 2),
            wind_factor: round_to(self.wind_factor, 2),
            season_factor: round_to(self.season_factor, 2),
        }
    }
}

/// Soiling state of a panel array
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilingResult {
    /// Output lost to soiling, in % (0-40)
    pub efficiency_loss: f64,
    /// Surface dust level (0-100)
    pub dust_level: f64,
    /// Cleaning urgency score (0-100)
    pub cleaning_urgency: f64,
    /// Effective soiling rate, in %/day
    pub daily_soiling_rate: f64,
    pub factors: SoilingFactors,
}

/// Soiling assessment for a site right now, with the data it was based on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSoiling {
    pub soiling: SoilingResult,
    pub region: RegionProfile,
    pub snapshot: EnvironmentalSnapshot,
    pub days_since_cleaning: u32,
    pub data_source: DataSource,
}

// ============================================================================
// Individual factors
// ============================================================================

/// Base daily soiling rate (%/day) by region type
pub fn base_rate(region_type: RegionType) -> f64 {
    match region_type {
        RegionType::Urban => 0.15,
        RegionType::Rural => 0.10,
        RegionType::Desert => 0.35,
    }
}

/// PM10 multiplier: 1.0 at 50 µg/m³, linear, floored at 0.3
pub fn pm10_factor(pm10: f64) -> f64 {
    (pm10 / 50.0).max(0.3)
}

/// AQI multiplier: only AQI above 50 adds a penalty
pub fn aqi_factor(aqi: f64) -> f64 {
    1.0 + (aqi - 50.0).max(0.0) / 500.0
}

/// Humidity multiplier: dry air loosens dust, damp air cements it
pub fn humidity_factor(humidity: f64) -> f64 {
    if humidity < 40.0 {
        0.9
    } else if humidity > 70.0 {
        1.0 + (humidity - 70.0) / 75.0
    } else {
        1.0
    }
}

/// Wind multiplier: moderate wind carries dust on, strong wind scours it off
pub fn wind_factor(wind_speed: f64) -> f64 {
    if wind_speed > 20.0 {
        (1.0 - (wind_speed - 20.0) / 60.0).max(0.7)
    } else if wind_speed > 5.0 {
        1.0 + (wind_speed - 5.0) / 100.0
    } else {
        1.0
    }
}

/// Seasonal multiplier
pub fn season_factor(season: Season) -> f64 {
    match season {
        Season::Winter => 1.1,
        Season::Spring => 1.2,
        Season::Summer => 1.0,
        Season::Monsoon => 0.5,
    }
}

// ============================================================================
// Model
// ============================================================================

/// Saturating efficiency loss after `days` at a given daily rate, in %
pub fn saturating_loss(daily_rate: f64, days: f64) -> f64 {
    let loss = MAX_LOSS * (1.0 - (-daily_rate * days / MAX_LOSS).exp());
    round_to(loss.clamp(0.0, MAX_LOSS), 1)
}

/// Dust level (0-100) for an efficiency loss
pub fn dust_level(efficiency_loss: f64) -> f64 {
    round_to((efficiency_loss * 2.5).min(100.0), 1)
}

/// Cleaning urgency (0-100); escalates faster past 3, 8 and 15 % loss
pub fn cleaning_urgency(efficiency_loss: f64) -> f64 {
    let urgency = if efficiency_loss > 15.0 {
        (70.0 + efficiency_loss).min(100.0)
    } else if efficiency_loss > 8.0 {
        (40.0 + efficiency_loss * 2.0).min(100.0)
    } else if efficiency_loss > 3.0 {
        (10.0 + efficiency_loss * 4.0).min(100.0)
    } else {
        (efficiency_loss * 3.0).max(0.0)
    };
    round_to(urgency, 1)
}

/// Run the soiling model for one observation
pub fn compute_soiling(
    days_since_cleaning: u32,
    inputs: &SoilingInputs,
    region_type: RegionType,
    season: Season,
) -> SoilingResult {
    let inputs = inputs.sanitized();
    let factors = SoilingFactors::compute(&inputs, region_type, season);
    let daily_rate = factors.daily_rate();

    let efficiency_loss = saturating_loss(daily_rate, f64::from(days_since_cleaning));

    SoilingResult {
        efficiency_loss,
        dust_level: dust_level(efficiency_loss),
        cleaning_urgency: cleaning_urgency(efficiency_loss),
        daily_soiling_rate: round_to(daily_rate, 3),
        factors: factors.rounded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pm10: f64, aqi: f64, humidity: f64, wind_speed: f64) -> SoilingInputs {
        SoilingInputs {
            pm10,
            aqi,
            humidity,
            wind_speed,
        }
    }

    #[test]
    fn test_pm10_factor_floor() {
        assert_eq!(pm10_factor(50.0), 1.0);
        assert_eq!(pm10_factor(200.0), 4.0);
        assert_eq!(pm10_factor(5.0), 0.3);
        assert_eq!(pm10_factor(0.0), 0.3);
    }

    #[test]
    fn test_aqi_factor() {
        assert_eq!(aqi_factor(30.0), 1.0);
        assert_eq!(aqi_factor(50.0), 1.0);
        assert!((aqi_factor(80.0) - 1.06).abs() < 1e-12);
        assert!((aqi_factor(300.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_humidity_factor_bands() {
        assert_eq!(humidity_factor(20.0), 0.9);
        assert_eq!(humidity_factor(40.0), 1.0);
        assert_eq!(humidity_factor(70.0), 1.0);
        assert!((humidity_factor(100.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_wind_factor_regimes() {
        assert_eq!(wind_factor(0.0), 1.0);
        assert_eq!(wind_factor(5.0), 1.0);
        assert!((wind_factor(10.0) - 1.05).abs() < 1e-12);
        assert!((wind_factor(20.0) - 1.15).abs() < 1e-12);
        assert!(wind_factor(30.0) <= 0.85);
        assert_eq!(wind_factor(80.0), 0.7);
    }

    #[test]
    fn test_season_and_base_tables() {
        assert_eq!(season_factor(Season::Monsoon), 0.5);
        assert_eq!(season_factor(Season::Spring), 1.2);
        assert_eq!(base_rate(RegionType::Desert), 0.35);
        assert_eq!(base_rate(RegionType::Rural), 0.10);
    }

    #[test]
    fn test_urgency_piecewise() {
        assert_eq!(cleaning_urgency(0.0), 0.0);
        assert_eq!(cleaning_urgency(2.0), 6.0);
        assert_eq!(cleaning_urgency(5.0), 30.0);
        assert_eq!(cleaning_urgency(10.0), 60.0);
        assert_eq!(cleaning_urgency(20.0), 90.0);
        assert_eq!(cleaning_urgency(40.0), 100.0);
    }

    #[test]
    fn test_zero_days_has_no_loss() {
        let result = compute_soiling(0, &SoilingInputs::default(), RegionType::Desert, Season::Spring);
        assert_eq!(result.efficiency_loss, 0.0);
        assert_eq!(result.dust_level, 0.0);
        assert_eq!(result.cleaning_urgency, 0.0);
    }

    #[test]
    fn test_daily_rate_clamped_high() {
        let result = compute_soiling(10, &inputs(2000.0, 500.0, 100.0, 10.0), RegionType::Desert, Season::Spring);
        assert_eq!(result.daily_soiling_rate, MAX_DAILY_RATE);
    }

    #[test]
    fn test_daily_rate_clamped_low() {
        let result = compute_soiling(10, &inputs(0.0, 0.0, 10.0, 60.0), RegionType::Rural, Season::Monsoon);
        assert_eq!(result.daily_soiling_rate, MIN_DAILY_RATE);
    }

    #[test]
    fn test_loss_saturates_below_ceiling() {
        let result = compute_soiling(100_000, &inputs(2000.0, 500.0, 100.0, 10.0), RegionType::Desert, Season::Spring);
        assert_eq!(result.efficiency_loss, MAX_LOSS);
        assert_eq!(result.dust_level, 100.0);
        assert_eq!(result.cleaning_urgency, 100.0);
    }

    #[test]
    fn test_non_finite_inputs_use_defaults() {
        let nan = inputs(f64::NAN, f64::INFINITY, f64::NAN, f64::NEG_INFINITY);
        let result = compute_soiling(15, &nan, RegionType::Urban, Season::Summer);
        let expected = compute_soiling(15, &SoilingInputs::default(), RegionType::Urban, Season::Summer);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_factors_are_reported() {
        let result = compute_soiling(15, &inputs(100.0, 150.0, 85.0, 10.0), RegionType::Urban, Season::Winter);
        assert_eq!(result.factors.base_rate, 0.15);
        assert_eq!(result.factors.pm10_factor, 2.0);
        assert_eq!(result.factors.aqi_factor, 1.2);
        assert_eq!(result.factors.humidity_factor, 1.2);
        assert_eq!(result.factors.wind_factor, 1.05);
        assert_eq!(result.factors.season_factor, 1.1);
    }
}
