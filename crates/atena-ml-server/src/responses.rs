//! Response bodies.
//!
//! The full service answers with `status`, the minimal one with `success`.
//! `user_context` echoes the caller's JSON untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use atena_ml_core::Recommendation;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStatus {
    pub pomodoro_optimizer: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub models: ModelStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MockHealthResponse {
    pub status: String,
    pub model_trained: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub user_context: Value,
    pub recommendation: Recommendation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MockRecommendResponse {
    pub success: bool,
    pub recommendation: Recommendation,
    pub user_context: Value,
}

/// `{status: "success", message}`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// `{success: true, message}`
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
