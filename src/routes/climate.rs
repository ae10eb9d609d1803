//! Climate series endpoint.
//!
//! - GET /api/v1/climate?location=..

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{ClimateSeries, Coordinates};
use crate::routes::{require_location, AppState};
use crate::services::trend::{analyze_series, TrendSummary};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClimateQuery {
    /// Place name to geocode
    pub location: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClimateResponse {
    pub location: String,
    pub coordinates: Coordinates,
    pub series: ClimateSeries,
    /// Trend summary per metric, keyed by series name
    pub trends: BTreeMap<String, TrendSummary>,
}

/// Twelve months of climate statistics for a location, with trends.
#[utoipa::path(
    get,
    path = "/api/v1/climate",
    tag = "Trends",
    params(ClimateQuery),
    responses(
        (status = 200, description = "Monthly climate series and per-metric trends", body = ClimateResponse),
        (status = 400, description = "Blank location", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse),
    )
)]
pub async fn get_climate(
    State(state): State<AppState>,
    Query(params): Query<ClimateQuery>,
) -> Result<Json<ClimateResponse>, AppError> {
    let location = require_location(&params.location)?;
    let coordinates = state.client.geocode(location).await?;
    let series = state
        .client
        .climate_series(coordinates, Utc::now().date_naive())
        .await?;
    let trends = analyze_series(series.metrics());

    tracing::debug!(
        location,
        months = series.months.len(),
        "Climate series assembled"
    );

    Ok(Json(ClimateResponse {
        location: location.to_string(),
        coordinates,
        series,
        trends,
    }))
}
