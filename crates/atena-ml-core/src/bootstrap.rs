//! Startup training data.
//!
//! The full service trains once at startup, from a JSON file of session
//! records when one is readable and from three built-in sample sessions
//! otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::predictor::TrainingSummary;
use crate::service::RecommendationService;
use crate::session::SessionRecord;
use crate::validation::{decode_training_batch, parse_body};

/// Where the startup fit came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapSource {
    File { path: PathBuf, records: usize },
    Sample,
}

/// Built-in sessions used when no bootstrap file can be loaded.
pub fn sample_records() -> Vec<SessionRecord> {
    vec![
        SessionRecord {
            time_of_day: 10,
            day_of_week: 1,
            subject: "math".to_string(),
            difficulty: 4,
            energy_level: 5,
            focus_score: 4,
            session_length: 30,
            break_length: 5,
            effectiveness: 0.85,
        },
        SessionRecord {
            time_of_day: 14,
            day_of_week: 3,
            subject: "history".to_string(),
            difficulty: 2,
            energy_level: 3,
            focus_score: 3,
            session_length: 25,
            break_length: 5,
            effectiveness: 0.75,
        },
        SessionRecord {
            time_of_day: 20,
            day_of_week: 5,
            subject: "programming".to_string(),
            difficulty: 5,
            energy_level: 2,
            focus_score: 2,
            session_length: 20,
            break_length: 7,
            effectiveness: 0.65,
        },
    ]
}

/// Read a JSON array of session records.
pub fn load_records(path: &Path) -> Result<Vec<SessionRecord>> {
    let bytes = fs::read(path)?;
    let value = parse_body(&bytes).map_err(CoreError::from)?;
    decode_training_batch(&value)
}

/// Train `service` from `path`, falling back to [`sample_records`].
///
/// Any failure reading, decoding or fitting the file is logged and answered
/// with the sample fit. Only a failure of the sample fit itself is returned.
pub fn pretrain(
    service: &RecommendationService,
    path: Option<&Path>,
) -> Result<(BootstrapSource, TrainingSummary)> {
    if let Some(path) = path {
        let fitted = load_records(path)
            .and_then(|records| service.train(&records).map_err(CoreError::from));
        match fitted {
            Ok(summary) => {
                info!(
                    path = %path.display(),
                    records = summary.records,
                    "Loaded initial training data"
                );
                let source = BootstrapSource::File {
                    path: path.to_path_buf(),
                    records: summary.records,
                };
                return Ok((source, summary));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load initial training data");
            }
        }
    }

    let summary = service.train(&sample_records())?;
    info!("Using sample training data");
    Ok((BootstrapSource::Sample, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::LoggingFeedbackSink;
    use crate::model::ForestParams;
    use crate::policy::PolicyKind;
    use crate::predictor::Predictor;
    use tempfile::TempDir;

    fn service() -> RecommendationService {
        RecommendationService::new(
            Predictor::with_params(ForestParams {
                n_estimators: 5,
                ..ForestParams::default()
            }),
            PolicyKind::EnergyDifficulty.build(),
            Box::new(LoggingFeedbackSink::new()),
        )
    }

    #[test]
    fn sample_has_three_subjects() {
        let records = sample_records();
        let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, ["math", "history", "programming"]);
    }

    #[test]
    fn no_path_uses_the_sample() {
        let svc = service();
        let (source, summary) = pretrain(&svc, None).unwrap();
        assert_eq!(source, BootstrapSource::Sample);
        assert_eq!(summary.records, 3);
        assert!(svc.is_trained());
    }

    #[test]
    fn missing_file_falls_back_to_sample() {
        let dir = TempDir::new().unwrap();
        let svc = service();
        let (source, _) = pretrain(&svc, Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(source, BootstrapSource::Sample);
        assert!(svc.is_trained());
    }

    #[test]
    fn malformed_file_falls_back_to_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("training.json");
        fs::write(&path, r#"[{"subject": "math"}]"#).unwrap();

        let (source, _) = pretrain(&service(), Some(&path)).unwrap();
        assert_eq!(source, BootstrapSource::Sample);
    }

    #[test]
    fn readable_file_is_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("training.json");
        let mut records = sample_records();
        records.extend(sample_records());
        fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();

        let svc = service();
        let (source, summary) = pretrain(&svc, Some(&path)).unwrap();
        assert_eq!(
            source,
            BootstrapSource::File {
                path: path.clone(),
                records: 6
            }
        );
        assert_eq!(summary.records, 6);
        assert_eq!(load_records(&path).unwrap().len(), 6);
    }
}
