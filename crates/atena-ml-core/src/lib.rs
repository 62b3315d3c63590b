//! # Atena ML Core Library
//!
//! This library provides the recommendation engine behind the Atena ML
//! microservice: it suggests pomodoro work/break lengths from a user's
//! context and captures session feedback for later retraining. The HTTP
//! server and the CLI are thin layers over the same core library.
//!
//! ## Architecture
//!
//! - **Features**: one-hot subject encoding plus z-score scaling of session
//!   records into a [`FeatureMatrix`]
//! - **Model**: a seeded random-forest regressor over encoded features
//! - **Predictor**: the trainable wrapper that tracks the untrained/trained
//!   state
//! - **Policy**: the decision functions that turn a [`UserContext`] into a
//!   [`Recommendation`]
//! - **Feedback**: capture-only sinks for completed sessions
//!
//! ## Key Components
//!
//! - [`RecommendationService`]: owns the predictor, policy and feedback sink
//! - [`Predictor`]: fit/predict with a one-way trained flag
//! - [`RecommendationPolicy`]: trait implemented by both heuristics
//! - [`Config`]: TOML configuration
//!
//! The energy/difficulty policy consults only the predictor's trained flag,
//! never its predictions.

pub mod bootstrap;
pub mod error;
pub mod feedback;
pub mod features;
pub mod model;
pub mod policy;
pub mod predictor;
pub mod service;
pub mod session;
pub mod storage;
pub mod validation;

pub use error::{ConfigError, CoreError, TrainingError, ValidationError};
pub use feedback::{FeedbackSink, JsonlFeedbackSink, LoggingFeedbackSink};
pub use features::{FeatureEncoder, FeatureMatrix};
pub use model::{ForestParams, RandomForestRegressor};
pub use policy::{
    DefaultAdjustmentPolicy, EnergyDifficultyPolicy, PolicyKind, RecommendationPolicy,
};
pub use predictor::{Predictor, TrainingSummary};
pub use service::RecommendationService;
pub use session::{Recommendation, SessionRecord, UserContext};
pub use storage::{Config, ServiceVariant};
