//! HTTP routes.
//!
//! Both service variants share paths; the handlers branch on
//! [`AppState::variant`] for request shape and response envelope.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use atena_ml_core::validation::{
    decode_training_batch, parse_body, parse_partial_context, parse_session_record,
    parse_user_context, require_data,
};
use atena_ml_core::{ServiceVariant, ValidationError};

use crate::error::ApiError;
use crate::responses::{
    HealthResponse, MockHealthResponse, MockRecommendResponse, ModelStatus, RecommendResponse,
    StatusMessage, SuccessMessage,
};
use crate::state::AppState;

type ApiResult = Result<Response, ApiError>;

const FEEDBACK_RECORDED: &str = "Feedback recorded";

/// Build the router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/pomodoro/recommend", post(recommend))
        .route("/api/pomodoro/feedback", post(feedback))
        .route("/api/pomodoro/retrain", post(retrain))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    match state.variant {
        ServiceVariant::Full => Json(HealthResponse {
            status: "healthy".to_string(),
            models: ModelStatus {
                pomodoro_optimizer: state.service.is_trained(),
            },
        })
        .into_response(),
        ServiceVariant::Minimal => Json(MockHealthResponse {
            status: "healthy".to_string(),
            model_trained: true,
            timestamp: Utc::now(),
        })
        .into_response(),
    }
}

async fn recommend(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let data = parse_body(&body)?;

    match state.variant {
        ServiceVariant::Full => {
            let context = parse_user_context(&data)?;
            let recommendation = state.service.recommend(&context);
            Ok(Json(RecommendResponse {
                user_context: data,
                recommendation,
            })
            .into_response())
        }
        ServiceVariant::Minimal => {
            let Value::Object(fields) = &data else {
                return Err(ValidationError::InvalidShape("Expected a JSON object".into()).into());
            };
            // a body without `context` is the context itself
            let raw_context = fields.get("context").cloned().unwrap_or_else(|| data.clone());
            info!(context = %raw_context, "Recommendation request");

            let context = parse_partial_context(&raw_context)?;
            let recommendation = state.service.recommend(&context);
            Ok(Json(MockRecommendResponse {
                success: true,
                recommendation,
                user_context: raw_context,
            })
            .into_response())
        }
    }
}

async fn feedback(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let data = parse_body(&body)?;

    match state.variant {
        ServiceVariant::Full => {
            let session = parse_session_record(&data)?;
            state.service.record_feedback(&session)?;
            Ok(Json(StatusMessage::success(FEEDBACK_RECORDED)).into_response())
        }
        ServiceVariant::Minimal => {
            // logged as sent, without field checks
            state.service.record_raw_feedback(require_data(&data)?)?;
            Ok(Json(SuccessMessage::new(FEEDBACK_RECORDED)).into_response())
        }
    }
}

async fn retrain(State(state): State<AppState>, body: Bytes) -> ApiResult {
    match state.variant {
        ServiceVariant::Full => retrain_full(state, &body).await,
        ServiceVariant::Minimal => retrain_simulated(state, &body).await,
    }
}

async fn retrain_full(state: AppState, body: &[u8]) -> ApiResult {
    let data = match parse_body(body) {
        Err(ValidationError::NoData) => Value::Null,
        other => other?,
    };
    let records = decode_training_batch(&data)?;
    let count = records.len();

    let service = state.service.clone();
    tokio::task::spawn_blocking(move || service.train(&records))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(records = count, "Model retrained");
    Ok(Json(StatusMessage::success(format!(
        "Model retrained with {count} records"
    )))
    .into_response())
}

async fn retrain_simulated(state: AppState, body: &[u8]) -> ApiResult {
    // the body is ignored, but must be JSON when present
    if !body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice::<Value>(body).map_err(|_| ValidationError::InvalidJson)?;
    }

    info!("Retraining requested");
    tokio::time::sleep(state.retrain_delay).await;
    debug!(delay_ms = state.retrain_delay.as_millis() as u64, "Simulated retrain finished");

    Ok(Json(SuccessMessage::new("Model retrained successfully")).into_response())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
