//! Solar Soiling Platform - Backend Server
//!
//! Estimates PV panel soiling from live weather and air quality, forecasts
//! it a week ahead and recommends when cleaning pays for itself.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use services::{DustService, EnvironmentService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dust: DustService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let environment = EnvironmentService::new(&config.providers);
        Self {
            dust: DustService::new(environment),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soiling_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Solar Soiling Server");
    tracing::info!("Environment: {}", config.environment);
    if config.providers.openweather_api_key.is_none() {
        tracing::info!("No OpenWeatherMap key configured, secondary weather source disabled");
    }
    if let Some(seed) = config.providers.estimate_seed {
        tracing::info!("Fallback estimates seeded with {}", seed);
    }

    let host: std::net::IpAddr = config.server.host.parse().map_err(|e| {
        error::AppError::Configuration(format!("invalid server.host {:?}: {}", config.server.host, e))
    })?;
    let addr = SocketAddr::from((host, config.server.port));

    // Build application
    let app = create_app(AppState::new(config));

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/ai", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Solar Soiling Platform API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = Config::default();
        config.providers.weather_base_url = "http://127.0.0.1:9".to_string();
        config.providers.air_quality_base_url = "http://127.0.0.1:9".to_string();
        config.providers.timeout_secs = 1;
        config.providers.estimate_seed = Some(42);
        create_app(AppState::new(config))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_current_soiling_uses_estimates_offline() {
        let response = test_app()
            .oneshot(
                Request::get("/ai/dust/current/24.8607/67.0011?days_since_cleaning=20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["dataSource"], "estimated");
        assert_eq!(body["data"]["region"]["regionType"], "desert");
        assert_eq!(body["data"]["daysSinceCleaning"], 20);
    }

    #[tokio::test]
    async fn test_current_soiling_rejects_bad_latitude() {
        let response = test_app()
            .oneshot(
                Request::get("/ai/dust/current/95.0/10.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["field"], "lat");
    }

    #[tokio::test]
    async fn test_forecast_has_seven_days() {
        let response = test_app()
            .oneshot(
                Request::get("/ai/dust/forecast/31.5204/74.3587")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["forecast"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_cleaning_schedule_with_override() {
        let payload = serde_json::json!({
            "lat": 31.5204,
            "lng": 74.3587,
            "days_since_cleaning": 30,
            "capacity_kw": 10.0,
            "electricity_rate": 60.0
        });
        let response = test_app()
            .oneshot(
                Request::post("/ai/dust/cleaning-schedule")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let data = &body["data"];
        assert_eq!(data["currency"], "PKR");
        assert_eq!(data["electricityRate"], 60.0);
        assert_eq!(data["cleaningCost"], 1500.0);
        assert_eq!(data["calendarEvents"].as_array().unwrap().len(), 6);
        assert_eq!(data["dataSource"], "estimated");
    }

    #[tokio::test]
    async fn test_cleaning_schedule_rejects_zero_capacity() {
        let payload = serde_json::json!({"lat": 31.5, "lng": 74.3, "capacity_kw": 0.0});
        let response = test_app()
            .oneshot(
                Request::post("/ai/dust/cleaning-schedule")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
