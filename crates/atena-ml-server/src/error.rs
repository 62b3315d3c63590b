//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use atena_ml_core::{CoreError, TrainingError, ValidationError};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request payload (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Training or other server-side failure (500)
    #[error("{0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl From<TrainingError> for ApiError {
    fn from(err: TrainingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
            ApiError::Internal(details) => {
                error!(details = %details, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": details }),
                )
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
        };
        (status, Json(body)).into_response()
    }
}
