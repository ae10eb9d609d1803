use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Failures of the scoring engine and trend analyzer.
///
/// All variants are local to one call and surface to the caller unchanged.
/// A condition-table miss is deliberately not represented here: it degrades
/// to fallback text instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Missing data: {input} reading has no usable {field} value")]
    MissingData {
        /// Which input was incomplete ("current" or "baseline")
        input: &'static str,
        /// Name of the absent field
        field: &'static str,
    },

    #[error("Sector {0} not supported for weather impact analysis")]
    UnsupportedSector(String),

    #[error("Cannot analyze a trend over an empty series")]
    EmptySeries,

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ExternalServiceError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Engine(err) => {
                let status = match err {
                    EngineError::MissingData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    EngineError::UnsupportedSector(_)
                    | EngineError::EmptySeries
                    | EngineError::InvalidWeights(_) => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
