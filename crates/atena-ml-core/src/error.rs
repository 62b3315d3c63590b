//! Core error types for atena-ml-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures belong to request boundaries, training failures propagate to
//! whoever asked for a fit, and recommendation never surfaces an error at all.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for atena-ml-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request or record validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Encoding or model fitting errors
    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised at the request boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Body was absent, `null`, or an empty object
    #[error("No data provided")]
    NoData,

    /// Body was not valid JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// One or more required fields were absent
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Payload had the wrong overall shape
    #[error("Invalid data format. {0}")]
    InvalidShape(String),

    /// Fields were present but could not be decoded
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Errors raised while encoding a batch or fitting the regression model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    /// Encoder was asked to fit on nothing
    #[error("Cannot encode an empty batch")]
    EmptyBatch,

    /// A record could not be decoded into a session record
    #[error("Invalid training record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    /// The target value is unusable
    #[error("Record {index} has a non-finite effectiveness value")]
    NonFiniteTarget { index: usize },

    /// Feature matrix and target vector disagree in length
    #[error("Feature matrix has {rows} rows but target vector has {targets} entries")]
    LengthMismatch { rows: usize, targets: usize },

    /// Prediction input does not have the fitted column count
    #[error("Expected {expected} feature columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Prediction was requested before any successful fit
    #[error("Model has not been trained")]
    NotTrained,

    /// Invalid model parameter
    #[error("Invalid model parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
