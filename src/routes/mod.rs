use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::AppError;
use crate::services::openweather::OpenWeatherClient;

pub mod climate;
pub mod health;
pub mod impact;
pub mod trend;

/// Shared application state for handlers that reach the weather provider.
#[derive(Clone)]
pub struct AppState {
    pub client: OpenWeatherClient,
    /// Score unknown sectors on `GET /impact` with the generic profile.
    pub allow_generic_sector: bool,
}

/// OpenAPI document for the Weather Impact API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Impact API",
        version = "0.1.0",
        description = "Sector weather-impact scoring for climate dashboards. \
            Compares current conditions against the monthly historical baseline \
            for a location, scores the deviation for an industry sector on a \
            bounded [-10, 10] scale, and summarizes climate trends.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Impact", description = "Sector weather-impact scoring"),
        (name = "Trends", description = "Trend and climate series analysis"),
    ),
    paths(
        health::health_check,
        impact::list_sectors,
        impact::score_readings,
        impact::get_location_impact,
        trend::analyze,
        climate::get_climate,
    ),
    components(
        schemas(
            health::HealthResponse,
            impact::SectorListResponse,
            impact::ScoreRequest,
            impact::WeightsBody,
            impact::ScoreResponse,
            impact::LocationImpactResponse,
            trend::TrendRequest,
            climate::ClimateResponse,
            crate::models::WeatherReading,
            crate::models::Baseline,
            crate::models::Coordinates,
            crate::models::ClimateSeries,
            crate::services::impact::ImpactResult,
            crate::services::impact::FactorImpacts,
            crate::services::impact::FactorImpact,
            crate::services::impact::OverallImpact,
            crate::services::advice::Guidance,
            crate::services::trend::TrendSummary,
            crate::services::trend::TrendDirection,
            crate::errors::ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/sectors", get(impact::list_sectors))
        .route("/api/v1/impact", get(impact::get_location_impact))
        .route("/api/v1/impact/score", post(impact::score_readings))
        .route("/api/v1/trend", post(trend::analyze))
        .route("/api/v1/climate", get(climate::get_climate))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Reject blank `location` query values before any provider call.
pub(crate) fn require_location(location: &str) -> Result<&str, AppError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "location must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
