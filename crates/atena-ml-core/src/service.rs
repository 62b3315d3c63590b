//! Recommendation service.
//!
//! Owns one predictor, one policy and one feedback sink. Shared between
//! request handlers behind an `Arc`; the predictor sits behind a `RwLock` so
//! recommendations read the trained flag while a retrain swaps the fit.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TrainingError};
use crate::feedback::FeedbackSink;
use crate::policy::RecommendationPolicy;
use crate::predictor::{Predictor, TrainingSummary};
use crate::session::{Recommendation, SessionRecord, UserContext};

pub struct RecommendationService {
    predictor: RwLock<Predictor>,
    policy: Box<dyn RecommendationPolicy>,
    feedback: Box<dyn FeedbackSink>,
}

impl std::fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationService")
            .field("policy", &self.policy.name())
            .field("is_trained", &self.is_trained())
            .finish()
    }
}

impl RecommendationService {
    pub fn new(
        predictor: Predictor,
        policy: Box<dyn RecommendationPolicy>,
        feedback: Box<dyn FeedbackSink>,
    ) -> Self {
        Self {
            predictor: RwLock::new(predictor),
            policy,
            feedback,
        }
    }

    // Poison is ignored: train assigns only after both fits succeed.
    fn read(&self) -> RwLockReadGuard<'_, Predictor> {
        self.predictor.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Predictor> {
        self.predictor.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn is_trained(&self) -> bool {
        self.read().is_trained()
    }

    pub fn last_trained_at(&self) -> Option<DateTime<Utc>> {
        self.read().last_trained_at()
    }

    pub fn feature_columns(&self) -> Vec<String> {
        self.read().feature_columns()
    }

    /// Fit the predictor on `records`. See [`Predictor::train`].
    pub fn train(
        &self,
        records: &[SessionRecord],
    ) -> std::result::Result<TrainingSummary, TrainingError> {
        self.write().train(records)
    }

    /// Run the configured policy. Never fails.
    pub fn recommend(&self, context: &UserContext) -> Recommendation {
        let trained = self.is_trained();
        let recommendation = self.policy.recommend(context, trained);
        debug!(
            policy = self.policy.name(),
            trained,
            pomodoro_minutes = recommendation.pomodoro_minutes,
            confidence = recommendation.confidence,
            "Recommendation computed"
        );
        recommendation
    }

    /// Hand a completed session to the feedback sink.
    ///
    /// The predictor is not touched.
    pub fn record_feedback(&self, session: &SessionRecord) -> Result<()> {
        self.feedback.record(session)
    }

    /// Hand an unvalidated payload to the feedback sink as sent.
    pub fn record_raw_feedback(&self, payload: &Value) -> Result<()> {
        self.feedback.record_raw(payload)
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.recorded_count()
    }

    /// Predict effectiveness for `records` with the current fit.
    pub fn predict_records(
        &self,
        records: &[SessionRecord],
    ) -> std::result::Result<Vec<f64>, TrainingError> {
        self.read().predict_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::sample_records;
    use crate::feedback::LoggingFeedbackSink;
    use crate::model::ForestParams;
    use crate::policy::PolicyKind;
    use std::sync::Arc;
    use std::thread;

    fn service(kind: PolicyKind) -> RecommendationService {
        RecommendationService::new(
            Predictor::with_params(ForestParams {
                n_estimators: 5,
                ..ForestParams::default()
            }),
            kind.build(),
            Box::new(LoggingFeedbackSink::new()),
        )
    }

    #[test]
    fn untrained_service_returns_the_default() {
        let svc = service(PolicyKind::EnergyDifficulty);
        let rec = svc.recommend(&UserContext::with_levels(1, 5));
        assert_eq!(rec, Recommendation::classic(0.5));
    }

    #[test]
    fn training_switches_policy_branch() {
        let svc = service(PolicyKind::EnergyDifficulty);
        svc.train(&sample_records()).unwrap();

        let rec = svc.recommend(&UserContext::with_levels(1, 5));
        assert_eq!(rec.pomodoro_minutes, 45);
        assert_eq!(rec.confidence, 0.7);
        assert!(svc.last_trained_at().is_some());
        assert_eq!(svc.feature_columns().len(), 10);
    }

    #[test]
    fn feedback_does_not_train() {
        let svc = service(PolicyKind::EnergyDifficulty);
        for record in sample_records() {
            svc.record_feedback(&record).unwrap();
        }
        svc.record_raw_feedback(&serde_json::json!({"subject": "math"})).unwrap();
        assert_eq!(svc.feedback_count(), 4);
        assert!(!svc.is_trained());
    }

    #[test]
    fn adjustment_policy_ignores_training() {
        let svc = service(PolicyKind::DefaultAdjustment);
        assert_eq!(svc.policy_name(), "default_adjustment");
        let ctx = UserContext::with_levels(4, 5);
        let before = svc.recommend(&ctx);
        svc.train(&sample_records()).unwrap();
        assert_eq!(svc.recommend(&ctx), before);
    }

    #[test]
    fn concurrent_recommend_and_retrain() {
        let svc = Arc::new(service(PolicyKind::EnergyDifficulty));
        svc.train(&sample_records()).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || {
                    if i == 0 {
                        svc.train(&sample_records()).map(|_| ()).unwrap();
                    }
                    for _ in 0..20 {
                        let rec = svc.recommend(&UserContext::with_levels(3, 3));
                        assert_eq!(rec.pomodoro_minutes, 45);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(svc.is_trained());
    }
}
