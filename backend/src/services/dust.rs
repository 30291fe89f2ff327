//! Dust monitoring service
//!
//! The three entry points the HTTP layer binds: current soiling, a seven-day
//! soiling forecast and a cleaning schedule. Each validates its inputs, gathers
//! environmental data concurrently, then runs the pure soiling kernel.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use shared::{
    compute_soiling, optimize_schedule, project_forecast, validate_capacity_kw,
    validate_coordinates, validate_cost_override, validate_days_since_cleaning, AirQualityDay,
    CleaningScheduleResult, CostModel, CostOverride, CurrentSoiling, DataSource,
    EnvironmentalSnapshot, ForecastDay, RegionProfile, ScheduleInputs, SoilingInputs, WeatherDay,
    FORECAST_HORIZON_DAYS,
};

use super::environment::{EnvironmentService, Sourced};
use crate::error::AppResult;

/// Dust monitoring service
#[derive(Clone)]
pub struct DustService {
    environment: EnvironmentService,
}

/// Soiling forecast with its aggregate provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DustForecast {
    pub forecast: Vec<ForecastDay>,
    pub data_source: DataSource,
}

/// Input for computing a cleaning schedule
#[derive(Debug, Clone)]
pub struct CleaningScheduleRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub days_since_cleaning: i64,
    pub capacity_kw: f64,
    pub cost: CostOverride,
}

impl DustService {
    /// Create a new DustService instance
    pub fn new(environment: EnvironmentService) -> Self {
        Self { environment }
    }

    /// Soiling state of a site right now
    pub async fn compute_current_soiling(
        &self,
        latitude: f64,
        longitude: f64,
        days_since_cleaning: i64,
    ) -> AppResult<CurrentSoiling> {
        validate_coordinates(latitude, longitude)?;
        let days = validate_days_since_cleaning(days_since_cleaning)?;
        let today = Utc::now().date_naive();

        let snapshot = self
            .environment
            .current_snapshot(latitude, longitude, today)
            .await;

        Ok(assess_current_soiling(snapshot, latitude, longitude, days, today))
    }

    /// Projected soiling over the next seven days
    pub async fn compute_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days_since_cleaning: i64,
    ) -> AppResult<DustForecast> {
        validate_coordinates(latitude, longitude)?;
        let days = validate_days_since_cleaning(days_since_cleaning)?;
        let today = Utc::now().date_naive();

        let (weather, air) = tokio::join!(
            self.environment
                .weather_forecast(latitude, longitude, today, FORECAST_HORIZON_DAYS),
            self.environment
                .air_quality_forecast(latitude, longitude, today, FORECAST_HORIZON_DAYS),
        );

        let month = site_today(&weather, today).month();
        let profile = RegionProfile::resolve(latitude, longitude, month);
        let forecast = project_forecast(&weather.value, &air.value, days, &profile);

        Ok(DustForecast {
            forecast,
            data_source: DataSource::combine([weather.source, air.source]),
        })
    }

    /// Recommended cleaning date and cost/benefit analysis
    pub async fn compute_cleaning_schedule(
        &self,
        request: CleaningScheduleRequest,
    ) -> AppResult<CleaningScheduleResult> {
        validate_coordinates(request.latitude, request.longitude)?;
        let days = validate_days_since_cleaning(request.days_since_cleaning)?;
        validate_capacity_kw(request.capacity_kw)?;
        validate_cost_override(&request.cost)?;
        let today = Utc::now().date_naive();

        let (latitude, longitude) = (request.latitude, request.longitude);
        let (snapshot, weather, air) = tokio::join!(
            self.environment.current_snapshot(latitude, longitude, today),
            self.environment
                .weather_forecast(latitude, longitude, today, FORECAST_HORIZON_DAYS),
            self.environment
                .air_quality_forecast(latitude, longitude, today, FORECAST_HORIZON_DAYS),
        );

        let data_source = DataSource::combine([snapshot.source, weather.source, air.source]);
        if data_source.is_estimated() {
            tracing::info!(
                "Scheduling cleaning at ({}, {}) with estimated data",
                latitude,
                longitude
            );
        } else {
            tracing::debug!("Scheduling cleaning at ({}, {}) with live data", latitude, longitude);
        }

        let today = site_today(&weather, today);
        Ok(plan_cleaning(&request, days, today, snapshot, weather, air))
    }
}

/// The site's local date: the first day of a live forecast, which the
/// provider reports in the site's timezone, else `fallback`
pub fn site_today(weather: &Sourced<Vec<WeatherDay>>, fallback: NaiveDate) -> NaiveDate {
    match (weather.source, weather.value.first()) {
        (DataSource::Live, Some(day)) => day.date,
        _ => fallback,
    }
}

/// Run the soiling model on a gathered snapshot
pub fn assess_current_soiling(
    snapshot: Sourced<EnvironmentalSnapshot>,
    latitude: f64,
    longitude: f64,
    days_since_cleaning: u32,
    today: NaiveDate,
) -> CurrentSoiling {
    let region = RegionProfile::resolve(latitude, longitude, today.month());
    let soiling = compute_soiling(
        days_since_cleaning,
        &SoilingInputs::from(&snapshot.value),
        region.region_type,
        region.season,
    );

    CurrentSoiling {
        soiling,
        region,
        snapshot: snapshot.value,
        days_since_cleaning,
        data_source: snapshot.source,
    }
}

/// Combine gathered data into a cleaning schedule
pub fn plan_cleaning(
    request: &CleaningScheduleRequest,
    days_since_cleaning: u32,
    today: NaiveDate,
    snapshot: Sourced<EnvironmentalSnapshot>,
    weather: Sourced<Vec<WeatherDay>>,
    air: Sourced<Vec<AirQualityDay>>,
) -> CleaningScheduleResult {
    let data_source = DataSource::combine([snapshot.source, weather.source, air.source]);
    let current = assess_current_soiling(
        snapshot,
        request.latitude,
        request.longitude,
        days_since_cleaning,
        today,
    );
    let forecast = project_forecast(&weather.value, &air.value, days_since_cleaning, &current.region);
    let cost = CostModel::resolve(request.latitude, request.longitude, Some(&request.cost));

    optimize_schedule(ScheduleInputs {
        latitude: request.latitude,
        longitude: request.longitude,
        days_since_cleaning,
        capacity_kw: request.capacity_kw,
        today,
        current: &current.soiling,
        forecast,
        cost,
        data_source,
    })
}
