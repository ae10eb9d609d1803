use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::services::trend::{analyze_trend, TrendSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrendRequest {
    /// Chronological samples, oldest first
    #[schema(example = json!([10.0, 5.0, 20.0]))]
    pub samples: Vec<f64>,
}

/// Mean, direction and percent change of a caller-supplied series.
#[utoipa::path(
    post,
    path = "/api/v1/trend",
    tag = "Trends",
    request_body = TrendRequest,
    responses(
        (status = 200, description = "Trend summary", body = TrendSummary),
        (status = 400, description = "Empty series", body = ErrorResponse),
    )
)]
pub async fn analyze(Json(request): Json<TrendRequest>) -> Result<Json<TrendSummary>, AppError> {
    Ok(Json(analyze_trend(&request.samples)?))
}
