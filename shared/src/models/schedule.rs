//! Cleaning schedule optimizer
//!
//! Layers cost-benefit economics on top of the soiling forecast to choose a
//! cleaning date and build a six-month reminder calendar.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::forecast::ForecastDay;
use super::region::BoundingBox;
use super::soiling::SoilingResult;
use crate::types::{round_to, DataSource};

/// Electricity tariff and cleaning cost in local currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostModel {
    /// Tariff per kWh
    pub electricity_rate: f64,
    /// Price of one cleaning
    pub cleaning_cost: f64,
    /// ISO 4217 currency code
    pub currency: String,
}

/// User-supplied cost values; any `None` field takes the regional default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOverride {
    pub electricity_rate: Option<f64>,
    pub cleaning_cost: Option<f64>,
    pub currency: Option<String>,
}

/// Regional cost defaults
#[derive(Debug, Clone, Copy)]
pub struct RegionalCost {
    pub region: BoundingBox,
    pub currency: &'static str,
    pub electricity_rate: f64,
    pub cleaning_cost: f64,
}

/// Cost defaults by region, checked in order
pub const REGIONAL_COSTS: [RegionalCost; 3] = [
    RegionalCost {
        region: BoundingBox {
            name: "Pakistan",
            lat_min: 24.0,
            lat_max: 37.0,
            lng_min: 60.0,
            lng_max: 77.0,
        },
        currency: "PKR",
        electricity_rate: 55.0,
        cleaning_cost: 1500.0,
    },
    RegionalCost {
        region: BoundingBox {
            name: "India",
            lat_min: 8.0,
            lat_max: 35.0,
            lng_min: 68.0,
            lng_max: 97.0,
        },
        currency: "INR",
        electricity_rate: 8.0,
        cleaning_cost: 500.0,
    },
    RegionalCost {
        region: BoundingBox {
            name: "UAE",
            lat_min: 22.0,
            lat_max: 26.0,
            lng_min: 51.0,
            lng_max: 56.0,
        },
        currency: "AED",
        electricity_rate: 0.38,
        cleaning_cost: 150.0,
    },
];

/// Used when no regional entry matches
pub const GLOBAL_COST: (&str, f64, f64) = ("USD", 0.15, 25.0);

impl CostModel {
    /// Regional defaults for coordinates
    pub fn regional_default(latitude: f64, longitude: f64) -> Self {
        REGIONAL_COSTS
            .iter()
            .find(|c| c.region.contains(latitude, longitude))
            .map(|c| CostModel {
                electricity_rate: c.electricity_rate,
                cleaning_cost: c.cleaning_cost,
                currency: c.currency.to_string(),
            })
            .unwrap_or_else(|| {
                let (currency, electricity_rate, cleaning_cost) = GLOBAL_COST;
                CostModel {
                    electricity_rate,
                    cleaning_cost,
                    currency: currency.to_string(),
                }
            })
    }

    /// Regional defaults with any user-supplied values taking precedence
    pub fn resolve(latitude: f64, longitude: f64, cost_override: Option<&CostOverride>) -> Self {
        let defaults = Self::regional_default(latitude, longitude);
        let Some(user) = cost_override else {
            return defaults;
        };

        CostModel {
            electricity_rate: user.electricity_rate.unwrap_or(defaults.electricity_rate),
            cleaning_cost: user.cleaning_cost.unwrap_or(defaults.cleaning_cost),
            currency: user.currency.clone().unwrap_or(defaults.currency),
        }
    }
}

/// How soon the panels should be cleaned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyTier::Low => write!(f, "low"),
            UrgencyTier::Medium => write!(f, "medium"),
            UrgencyTier::High => write!(f, "high"),
        }
    }
}

/// A reminder on the cleaning calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: String,
    pub urgency: String,
}

/// Everything the optimizer needs, already gathered
#[derive(Debug, Clone)]
pub struct ScheduleInputs<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub days_since_cleaning: u32,
    pub capacity_kw: f64,
    pub today: NaiveDate,
    pub current: &'a SoilingResult,
    pub forecast: Vec<ForecastDay>,
    pub cost: CostModel,
    pub data_source: DataSource,
}

/// Recommended cleaning plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningScheduleResult {
    pub recommended_date: NaiveDate,
    pub urgency: UrgencyTier,
    /// Percentage points of efficiency regained by cleaning now
    pub estimated_recovery: f64,
    pub current_efficiency_loss: f64,
    /// Monthly loss relative to one cleaning's cost
    pub cost_benefit_ratio: f64,
    pub daily_loss_cost: f64,
    pub cleaning_cost: f64,
    pub currency: String,
    pub electricity_rate: f64,
    pub days_until_breakeven: f64,
    pub recommendation: String,
    pub forecast: Vec<ForecastDay>,
    pub calendar_events: Vec<CalendarEvent>,
    pub data_source: DataSource,
}

/// Number of monthly reminders generated
pub const CALENDAR_EVENT_COUNT: u32 = 6;
/// Spacing between reminders, in days
pub const CALENDAR_INTERVAL_DAYS: i64 = 30;

/// Equivalent full-sun hours per day, peaking at 25° latitude
pub fn peak_sun_hours(latitude: f64) -> f64 {
    (5.5 - (latitude.abs() - 25.0).abs() * 0.08).clamp(3.0, 7.0)
}

/// Cost of the energy lost to soiling each day
pub fn daily_loss_cost(capacity_kw: f64, latitude: f64, efficiency_loss: f64, tariff: f64) -> f64 {
    let daily_production = capacity_kw * peak_sun_hours(latitude);
    daily_production * (efficiency_loss / 100.0) * tariff
}

/// Days until the accumulated loss pays for one cleaning (at least 1)
pub fn days_until_breakeven(cleaning_cost: f64, daily_loss_cost: f64) -> f64 {
    (cleaning_cost / daily_loss_cost.max(0.01)).max(1.0)
}

/// Monthly loss divided by one cleaning's cost
pub fn cost_benefit_ratio(daily_loss_cost: f64, cleaning_cost: f64) -> f64 {
    daily_loss_cost * 30.0 / cleaning_cost.max(1.0)
}

pub fn urgency_tier(efficiency_loss: f64, days_since_cleaning: u32) -> UrgencyTier {
    if efficiency_loss > 12.0 || days_since_cleaning > 45 {
        UrgencyTier::High
    } else if efficiency_loss > 5.0 || days_since_cleaning > 25 {
        UrgencyTier::Medium
    } else {
        UrgencyTier::Low
    }
}

/// Desirability of cleaning on a forecast day; higher is better
pub fn clean_day_score(day: &ForecastDay) -> f64 {
    (100.0 - day.rain_probability) * 0.4
        + (50.0 - day.wind_max.min(50.0)) * 0.3
        + (200.0 - f64::from(day.aqi.min(200))) * 0.3
}

/// Highest scoring good-to-clean day; the earliest wins a tie
pub fn best_cleaning_day(forecast: &[ForecastDay]) -> Option<NaiveDate> {
    forecast
        .iter()
        .filter(|day| day.is_good_day())
        .fold(None::<(NaiveDate, f64)>, |best, day| {
            let score = clean_day_score(day);
            match best {
                Some((_, best_score)) if score <= best_score => best,
                _ => Some((day.date, score)),
            }
        })
        .map(|(date, _)| date)
}

/// Breakeven-anchored date used when no forecast day qualifies
pub fn fallback_cleaning_date(today: NaiveDate, days_until_breakeven: f64) -> NaiveDate {
    let offset = days_until_breakeven.round().clamp(1.0, 7.0) as i64;
    today + Duration::days(offset)
}

/// Six monthly reminders starting 30 days from today
pub fn calendar_events(today: NaiveDate) -> Vec<CalendarEvent> {
    (1..=i64::from(CALENDAR_EVENT_COUNT))
        .map(|n| CalendarEvent {
            date: today + Duration::days(n * CALENDAR_INTERVAL_DAYS),
            event_type: "recommended_cleaning".to_string(),
            urgency: "scheduled".to_string(),
        })
        .collect()
}

/// Choose a cleaning date and summarize the economics
pub fn optimize_schedule(inputs: ScheduleInputs<'_>) -> CleaningScheduleResult {
    let current_loss = inputs.current.efficiency_loss;
    let cost = inputs.cost;

    let loss_cost = daily_loss_cost(
        inputs.capacity_kw,
        inputs.latitude,
        current_loss,
        cost.electricity_rate,
    );
    let breakeven = days_until_breakeven(cost.cleaning_cost, loss_cost);
    let urgency = urgency_tier(current_loss, inputs.days_since_cleaning);

    let recommended_date = best_cleaning_day(&inputs.forecast)
        .unwrap_or_else(|| fallback_cleaning_date(inputs.today, breakeven));

    CleaningScheduleResult {
        recommended_date,
        urgency,
        estimated_recovery: round_to(current_loss, 1),
        current_efficiency_loss: round_to(current_loss, 1),
        cost_benefit_ratio: round_to(cost_benefit_ratio(loss_cost, cost.cleaning_cost), 2),
        daily_loss_cost: round_to(loss_cost, 2),
        cleaning_cost: cost.cleaning_cost,
        electricity_rate: cost.electricity_rate,
        currency: cost.currency,
        days_until_breakeven: round_to(breakeven, 1),
        recommendation: format!(
            "Clean panels by {} to recover {:.1}% efficiency",
            recommended_date, current_loss
        ),
        forecast: inputs.forecast,
        calendar_events: calendar_events(inputs.today),
        data_source: inputs.data_source,
    }
}
