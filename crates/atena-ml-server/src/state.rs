//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use atena_ml_core::bootstrap::pretrain;
use atena_ml_core::{
    Config, CoreError, FeedbackSink, JsonlFeedbackSink, LoggingFeedbackSink, Predictor,
    RecommendationService, ServiceVariant,
};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
    pub variant: ServiceVariant,
    /// Simulated retrain time of the minimal variant
    pub retrain_delay: Duration,
}

impl AppState {
    pub fn new(service: RecommendationService, variant: ServiceVariant) -> Self {
        Self {
            service: Arc::new(service),
            variant,
            retrain_delay: Duration::ZERO,
        }
    }

    pub fn with_retrain_delay(mut self, delay: Duration) -> Self {
        self.retrain_delay = delay;
        self
    }

    /// Build the service `config` describes, pre-training the full variant.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let variant = config.server.variant;
        let feedback: Box<dyn FeedbackSink> =
            if variant == ServiceVariant::Minimal || config.data.persist_feedback {
                Box::new(JsonlFeedbackSink::new(config.feedback_log_path()?))
            } else {
                Box::new(LoggingFeedbackSink::new())
            };

        let service = RecommendationService::new(
            Predictor::with_params(config.model.clone()),
            variant.policy_kind().build(),
            feedback,
        );

        if variant == ServiceVariant::Full {
            let bootstrap = config.bootstrap_path().ok();
            let (source, summary) = pretrain(&service, bootstrap.as_deref())?;
            info!(?source, records = summary.records, "Predictor pre-trained");
        }

        Ok(Self::new(service, variant)
            .with_retrain_delay(Duration::from_millis(config.mock.retrain_delay_ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, variant: ServiceVariant) -> Config {
        let mut config = Config::default();
        config.server.variant = variant;
        config.model.n_estimators = 5;
        config.data.bootstrap_file = dir.path().join("missing.json");
        config.data.feedback_log = dir.path().join("feedback_log.jsonl");
        config.mock.retrain_delay_ms = 25;
        config
    }

    #[test]
    fn full_variant_pretrains_from_sample() {
        let dir = TempDir::new().unwrap();
        let state = AppState::from_config(&config_in(&dir, ServiceVariant::Full)).unwrap();
        assert!(state.service.is_trained());
        assert_eq!(state.service.policy_name(), "energy_difficulty");
    }

    #[test]
    fn minimal_variant_stays_untrained_and_persists_feedback() {
        let dir = TempDir::new().unwrap();
        let state = AppState::from_config(&config_in(&dir, ServiceVariant::Minimal)).unwrap();
        assert!(!state.service.is_trained());
        assert_eq!(state.service.policy_name(), "default_adjustment");
        assert_eq!(state.retrain_delay, Duration::from_millis(25));

        let session = atena_ml_core::bootstrap::sample_records().remove(0);
        state.service.record_feedback(&session).unwrap();
        assert!(dir.path().join("feedback_log.jsonl").exists());
    }
}
