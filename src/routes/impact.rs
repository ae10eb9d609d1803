//! Impact HTTP endpoints.
//!
//! - GET  /api/v1/sectors
//! - POST /api/v1/impact/score
//! - GET  /api/v1/impact?location=..&sector=..

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{Baseline, Coordinates, Sector, WeatherReading};
use crate::routes::{require_location, AppState};
use crate::services::advice::{recommendations, summarize, Guidance};
use crate::services::impact::{score_impact_with, ImpactResult, ScoringOptions};
use crate::services::profiles::{resolve_profile, SectorProfile, Weights};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Custom factor weights. Must be non-negative and sum to 1.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct WeightsBody {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreRequest {
    /// Sector name, case-insensitive (e.g. "Agriculture")
    #[schema(example = "Agriculture")]
    pub sector: String,
    pub current: WeatherReading,
    pub baseline: Baseline,
    /// Score unknown sectors with the generic profile. Defaults to the
    /// server's `ALLOW_GENERIC_SECTOR` setting.
    #[serde(default)]
    pub allow_generic_fallback: Option<bool>,
    /// Overrides the default 0.5 / 0.3 / 0.2 weighting
    #[serde(default)]
    pub weights: Option<WeightsBody>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ImpactQuery {
    /// Place name to geocode (e.g. "Aarhus" or "Aarhus,DK")
    pub location: String,
    /// Sector name, case-insensitive
    pub sector: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct SectorListResponse {
    /// Sectors with a dedicated impact profile
    pub sectors: Vec<String>,
    /// Whether `GET /impact` scores other sector names generically
    pub generic_fallback: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreResponse {
    pub analysis: ImpactResult,
    /// Actions for every factor whose deviation crossed its threshold
    pub recommendations: Vec<String>,
    pub guidance: Guidance,
    pub guidance_message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationImpactResponse {
    pub location: String,
    pub coordinates: Coordinates,
    /// Calendar month (1-12) of the baseline used
    pub month: u32,
    pub analysis: ImpactResult,
    pub recommendations: Vec<String>,
    pub guidance: Guidance,
    pub guidance_message: String,
    /// One-paragraph plain-language summary
    pub summary: String,
}

/// Attach advice derived from the scored result.
fn assess(profile: &SectorProfile, analysis: ImpactResult) -> ScoreResponse {
    let recommendations = recommendations(&profile.advice, &analysis.deviations());
    let guidance = Guidance::for_score(analysis.overall_impact.score);
    let guidance_message = guidance.message(&analysis.sector);
    ScoreResponse {
        analysis,
        recommendations,
        guidance,
        guidance_message,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List the sectors with dedicated impact profiles.
#[utoipa::path(
    get,
    path = "/api/v1/sectors",
    tag = "Impact",
    responses(
        (status = 200, description = "Supported sectors", body = SectorListResponse),
    )
)]
pub async fn list_sectors(State(state): State<AppState>) -> Json<SectorListResponse> {
    Json(SectorListResponse {
        sectors: Sector::ALL.iter().map(|s| s.name().to_string()).collect(),
        generic_fallback: state.allow_generic_sector,
    })
}

/// Score caller-supplied current and baseline readings for a sector.
///
/// No provider calls: the dashboard can score readings it already holds.
#[utoipa::path(
    post,
    path = "/api/v1/impact/score",
    tag = "Impact",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Impact analysis with advice", body = ScoreResponse),
        (status = 400, description = "Unsupported sector or invalid weights", body = ErrorResponse),
        (status = 422, description = "A reading is missing a required value", body = ErrorResponse),
    )
)]
pub async fn score_readings(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let allow_generic_fallback = request
        .allow_generic_fallback
        .unwrap_or(state.allow_generic_sector);
    let weights = match request.weights {
        Some(w) => Weights::new(w.temperature, w.humidity, w.wind)?,
        None => Weights::default(),
    };
    let options = ScoringOptions {
        weights,
        allow_generic_fallback,
    };

    let profile = resolve_profile(&request.sector, allow_generic_fallback)?;
    let analysis = score_impact_with(
        &request.current,
        &request.baseline,
        &request.sector,
        &options,
    )?;

    Ok(Json(assess(&profile, analysis)))
}

/// Score the live weather at a location against its monthly baseline.
///
/// The sector is validated before any provider call. Current conditions and
/// the current month's statistics are fetched concurrently.
#[utoipa::path(
    get,
    path = "/api/v1/impact",
    tag = "Impact",
    params(ImpactQuery),
    responses(
        (status = 200, description = "Impact analysis for the location", body = LocationImpactResponse),
        (status = 400, description = "Blank location or unsupported sector", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 422, description = "Provider data incomplete", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse),
    )
)]
pub async fn get_location_impact(
    State(state): State<AppState>,
    Query(params): Query<ImpactQuery>,
) -> Result<Json<LocationImpactResponse>, AppError> {
    let location = require_location(&params.location)?;
    let profile = resolve_profile(&params.sector, state.allow_generic_sector)?;

    let coordinates = state.client.geocode(location).await?;
    let month = Utc::now().month();
    let (current, baseline) = tokio::try_join!(
        state.client.current_reading(coordinates),
        state.client.monthly_baseline(coordinates, month),
    )?;

    let options = ScoringOptions {
        allow_generic_fallback: state.allow_generic_sector,
        ..ScoringOptions::default()
    };
    let analysis = score_impact_with(&current, &baseline, &params.sector, &options)?;
    let summary = summarize(location, &analysis);
    let assessed = assess(&profile, analysis);

    tracing::info!(
        location,
        sector = %assessed.analysis.sector,
        score = assessed.analysis.overall_impact.score,
        "Location impact scored"
    );

    Ok(Json(LocationImpactResponse {
        location: location.to_string(),
        coordinates,
        month,
        analysis: assessed.analysis,
        recommendations: assessed.recommendations,
        guidance: assessed.guidance,
        guidance_message: assessed.guidance_message,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{router, test_support::offline_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn hot_day(sector: &str) -> Value {
        json!({
            "sector": sector,
            "current": { "temperature_c": 20.0, "humidity_pct": 60.0, "wind_speed_ms": 2.0, "condition": "Clear" },
            "baseline": { "temperature_c": 15.0, "humidity_pct": 60.0, "wind_speed_ms": 3.0 }
        })
    }

    #[tokio::test]
    async fn test_score_agriculture() {
        let app = router(offline_state(false));
        let (status, body) = post_json(app, "/api/v1/impact/score", hot_day("agriculture")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["sector"], "Agriculture");
        assert_eq!(body["analysis"]["impacts"]["temperature"]["impact_score"], -10.0);
        assert_eq!(body["analysis"]["impacts"]["wind"]["impact_score"], -0.8);
        assert_eq!(body["analysis"]["overall_impact"]["score"], -5.2);
        assert_eq!(
            body["analysis"]["overall_impact"]["interpretation"],
            "negative impact on operations and efficiency"
        );
        assert_eq!(body["analysis"]["condition_impact"], "optimal conditions for field operations");
        assert_eq!(body["guidance"], "suboptimal");
        assert_eq!(
            body["recommendations"],
            json!(["Increase irrigation and monitor crop water stress"])
        );
    }

    #[tokio::test]
    async fn test_score_unknown_sector_rejected() {
        let app = router(offline_state(false));
        let (status, body) = post_json(app, "/api/v1/impact/score", hot_day("Mining")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Sector Mining not supported for weather impact analysis"
        );
    }

    #[tokio::test]
    async fn test_score_generic_fallback_opt_in() {
        let app = router(offline_state(false));
        let mut request = hot_day("Mining");
        request["allow_generic_fallback"] = json!(true);
        let (status, body) = post_json(app, "/api/v1/impact/score", request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["sector"], "Mining");
        // linear(-1), linear(-0.5), linear(-1): -5, 0, +1 → -2.3
        assert_eq!(body["analysis"]["overall_impact"]["score"], -2.3);
        assert_eq!(
            body["recommendations"],
            json!(["Adjust cooling systems for Mining operations"])
        );
    }

    #[tokio::test]
    async fn test_score_server_default_fallback() {
        let app = router(offline_state(true));
        let (status, body) = post_json(app, "/api/v1/impact/score", hot_day("Mining")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["sector"], "Mining");
    }

    #[tokio::test]
    async fn test_score_missing_humidity_is_unprocessable() {
        let app = router(offline_state(false));
        let request = json!({
            "sector": "Retail",
            "current": { "temperature_c": 20.0, "wind_speed_ms": 2.0, "condition": "Rain" },
            "baseline": { "temperature_c": 15.0, "humidity_pct": 60.0, "wind_speed_ms": 3.0 }
        });
        let (status, body) = post_json(app, "/api/v1/impact/score", request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("humidity"));
    }

    #[tokio::test]
    async fn test_score_custom_weights() {
        let app = router(offline_state(false));
        let mut request = hot_day("Agriculture");
        request["weights"] = json!({ "temperature": 1.0, "humidity": 0.0, "wind": 0.0 });
        let (status, body) = post_json(app, "/api/v1/impact/score", request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["overall_impact"]["score"], -10.0);
        assert_eq!(body["guidance"], "critical");
    }

    #[tokio::test]
    async fn test_score_invalid_weights() {
        let app = router(offline_state(false));
        let mut request = hot_day("Agriculture");
        request["weights"] = json!({ "temperature": 0.5, "humidity": 0.5, "wind": 0.5 });
        let (status, body) = post_json(app, "/api/v1/impact/score", request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid weights"));
    }

    #[tokio::test]
    async fn test_list_sectors() {
        let app = router(offline_state(false));
        let (status, body) = get_json(app, "/api/v1/sectors").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sectors"].as_array().unwrap().len(), 6);
        assert_eq!(body["sectors"][0], "Agriculture");
        assert_eq!(body["generic_fallback"], false);
    }

    #[tokio::test]
    async fn test_location_impact_rejects_sector_before_fetching() {
        // The offline client would fail with 502 if it were called.
        let app = router(offline_state(false));
        let (status, body) = get_json(app, "/api/v1/impact?location=Aarhus&sector=Mining").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Mining"));
    }

    #[tokio::test]
    async fn test_location_impact_rejects_blank_location() {
        let app = router(offline_state(false));
        let (status, body) = get_json(app, "/api/v1/impact?location=%20&sector=Retail").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "location must not be empty");
    }
}
