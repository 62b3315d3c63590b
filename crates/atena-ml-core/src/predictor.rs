//! Trainable predictor.
//!
//! Couples a [`FeatureEncoder`] with a [`RandomForestRegressor`] and tracks
//! whether a fit has ever succeeded. The trained flag moves one way: once
//! set, nothing clears it, and a failed retrain leaves the previous encoder
//! and forest in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::TrainingError;
use crate::features::{FeatureEncoder, FeatureMatrix};
use crate::model::{ForestParams, RandomForestRegressor};
use crate::session::SessionRecord;

/// Outcome of a [`Predictor::train`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Records the model was fitted on (0 when skipped)
    pub records: usize,
    /// Encoded feature column names
    pub columns: Vec<String>,
    /// True when the batch was empty and nothing happened
    pub skipped: bool,
    pub trained_at: Option<DateTime<Utc>>,
}

impl TrainingSummary {
    fn skipped() -> Self {
        Self {
            records: 0,
            columns: Vec::new(),
            skipped: true,
            trained_at: None,
        }
    }
}

/// Encoder + regression forest with an untrained/trained state.
#[derive(Debug, Clone)]
pub struct Predictor {
    encoder: FeatureEncoder,
    model: RandomForestRegressor,
    is_trained: bool,
    last_trained_at: Option<DateTime<Utc>>,
    trained_records: usize,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor {
    /// Create an untrained predictor with default forest parameters.
    pub fn new() -> Self {
        Self::with_params(ForestParams::default())
    }

    /// Create an untrained predictor with custom forest parameters.
    pub fn with_params(params: ForestParams) -> Self {
        info!(
            n_estimators = params.n_estimators,
            max_depth = params.max_depth,
            "Predictor initialized"
        );
        Self {
            encoder: FeatureEncoder::new(),
            model: RandomForestRegressor::new(params),
            is_trained: false,
            last_trained_at: None,
            trained_records: 0,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn last_trained_at(&self) -> Option<DateTime<Utc>> {
        self.last_trained_at
    }

    /// Size of the batch behind the current fit.
    pub fn trained_records(&self) -> usize {
        self.trained_records
    }

    pub fn params(&self) -> &ForestParams {
        self.model.params()
    }

    /// Feature columns of the current fit; empty while untrained.
    pub fn feature_columns(&self) -> Vec<String> {
        if self.encoder.is_fitted() {
            self.encoder.columns()
        } else {
            Vec::new()
        }
    }

    /// Fit the encoder and forest on `records`.
    ///
    /// An empty batch is a logged no-op. Otherwise encoding and fitting run
    /// against fresh instances that replace the current ones only when both
    /// succeed.
    ///
    /// # Errors
    /// Propagates encoding and fitting failures; state is left unchanged.
    pub fn train(&mut self, records: &[SessionRecord]) -> Result<TrainingSummary, TrainingError> {
        if records.is_empty() {
            warn!("Empty training data provided");
            return Ok(TrainingSummary::skipped());
        }

        let fitted = Self::fit_fresh(self.model.params().clone(), records);
        let (encoder, model) = match fitted {
            Ok(pair) => pair,
            Err(e) => {
                error!(error = %e, records = records.len(), "Error training model");
                return Err(e);
            }
        };

        let trained_at = Utc::now();
        self.encoder = encoder;
        self.model = model;
        self.is_trained = true;
        self.last_trained_at = Some(trained_at);
        self.trained_records = records.len();

        let columns = self.encoder.columns();
        info!(
            records = records.len(),
            features = columns.len(),
            "Model trained successfully"
        );

        Ok(TrainingSummary {
            records: records.len(),
            columns,
            skipped: false,
            trained_at: Some(trained_at),
        })
    }

    fn fit_fresh(
        params: ForestParams,
        records: &[SessionRecord],
    ) -> Result<(FeatureEncoder, RandomForestRegressor), TrainingError> {
        let mut encoder = FeatureEncoder::new();
        let (x, y) = encoder.encode(records)?;
        let mut model = RandomForestRegressor::new(params);
        model.fit(&x, &y)?;
        Ok((encoder, model))
    }

    /// Predict effectiveness for an already-encoded matrix.
    ///
    /// No recommendation policy calls this.
    ///
    /// # Errors
    /// Fails while untrained or when the column count does not match the fit.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, TrainingError> {
        if !self.is_trained {
            return Err(TrainingError::NotTrained);
        }
        self.model.predict(features)
    }

    /// Encode `records` with the fitted encoder and predict effectiveness.
    ///
    /// # Errors
    /// Fails while untrained.
    pub fn predict_records(&self, records: &[SessionRecord]) -> Result<Vec<f64>, TrainingError> {
        let features = self.encoder.transform(records)?;
        self.predict(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::sample_records;

    fn fast_params() -> ForestParams {
        ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        }
    }

    #[test]
    fn starts_untrained() {
        let predictor = Predictor::new();
        assert!(!predictor.is_trained());
        assert!(predictor.feature_columns().is_empty());
        assert!(predictor.last_trained_at().is_none());
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut predictor = Predictor::with_params(fast_params());
        let summary = predictor.train(&[]).unwrap();

        assert!(summary.skipped);
        assert_eq!(summary.records, 0);
        assert!(!predictor.is_trained());
    }

    #[test]
    fn training_sets_the_flag_and_reports_columns() {
        let mut predictor = Predictor::with_params(fast_params());
        let summary = predictor.train(&sample_records()).unwrap();

        assert!(predictor.is_trained());
        assert!(!summary.skipped);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.columns.len(), 10);
        assert_eq!(summary.columns, predictor.feature_columns());
        assert_eq!(predictor.trained_records(), 3);
    }

    #[test]
    fn empty_batch_after_training_keeps_trained_state() {
        let mut predictor = Predictor::with_params(fast_params());
        predictor.train(&sample_records()).unwrap();
        predictor.train(&[]).unwrap();

        assert!(predictor.is_trained());
        assert_eq!(predictor.trained_records(), 3);
    }

    #[test]
    fn failed_training_leaves_state_unchanged() {
        let mut predictor = Predictor::with_params(fast_params());
        predictor.train(&sample_records()).unwrap();
        let columns = predictor.feature_columns();

        let mut bad = sample_records();
        let template = bad[0].clone();
        bad.push(SessionRecord {
            subject: "chemistry".into(),
            effectiveness: f64::INFINITY,
            ..template
        });
        let err = predictor.train(&bad).unwrap_err();

        assert_eq!(err, TrainingError::NonFiniteTarget { index: 3 });
        assert!(predictor.is_trained());
        assert_eq!(predictor.feature_columns(), columns);
        assert_eq!(predictor.trained_records(), 3);
    }

    #[test]
    fn failed_first_training_stays_untrained() {
        let mut predictor = Predictor::with_params(ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        });
        assert!(predictor.train(&sample_records()).is_err());
        assert!(!predictor.is_trained());
    }

    #[test]
    fn predict_requires_training() {
        let predictor = Predictor::new();
        assert_eq!(
            predictor.predict_records(&sample_records()),
            Err(TrainingError::NotTrained)
        );
    }

    #[test]
    fn predictions_stay_within_target_range() {
        let mut predictor = Predictor::with_params(fast_params());
        predictor.train(&sample_records()).unwrap();

        let predictions = predictor.predict_records(&sample_records()).unwrap();
        assert_eq!(predictions.len(), 3);
        assert!(predictions.iter().all(|p| (0.65..=0.85).contains(p)));
    }
}
