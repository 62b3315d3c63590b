//! Session record encoder.
//!
//! Column layout is the seven numeric session fields in declaration order,
//! then one `subject=<value>` indicator per subject in order of first
//! appearance in the fitted batch. `effectiveness` is the target and never
//! appears as a feature.

use serde::{Deserialize, Serialize};

use super::FeatureMatrix;
use crate::error::TrainingError;
use crate::session::SessionRecord;

/// Numeric feature columns, in output order.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "time_of_day",
    "day_of_week",
    "difficulty",
    "energy_level",
    "focus_score",
    "session_length",
    "break_length",
];

/// Fitted standardization parameters for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnScaling {
    pub mean: f64,
    /// Population standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

impl ColumnScaling {
    fn fit(values: impl Iterator<Item = f64> + Clone, n: usize) -> Self {
        let count = n as f64;
        let mean = values.clone().sum::<f64>() / count;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let std_dev = variance.sqrt();
        let scale = if std_dev > 10.0 * f64::EPSILON {
            std_dev
        } else {
            1.0
        };
        Self { mean, scale }
    }

    fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// One-hot + standard-scaling encoder for session records.
///
/// The subject vocabulary and scaling statistics are captured by
/// [`encode`](Self::encode) and retained until the next call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureEncoder {
    vocabulary: Vec<String>,
    scaling: Vec<ColumnScaling>,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`encode`](Self::encode) has succeeded at least once.
    pub fn is_fitted(&self) -> bool {
        !self.scaling.is_empty()
    }

    /// Subjects seen by the last fit, in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn scaling(&self) -> &[ColumnScaling] {
        &self.scaling
    }

    /// Column names produced by the last fit.
    pub fn columns(&self) -> Vec<String> {
        Self::column_names(&self.vocabulary)
    }

    fn column_names(vocabulary: &[String]) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(vocabulary.iter().map(|s| format!("subject={s}")))
            .collect()
    }

    fn raw_row(record: &SessionRecord, vocabulary: &[String]) -> Vec<f64> {
        let mut row = Vec::with_capacity(NUMERIC_COLUMNS.len() + vocabulary.len());
        row.extend([
            f64::from(record.time_of_day),
            f64::from(record.day_of_week),
            f64::from(record.difficulty),
            f64::from(record.energy_level),
            f64::from(record.focus_score),
            f64::from(record.session_length),
            f64::from(record.break_length),
        ]);
        row.extend(vocabulary.iter().map(|subject| {
            if *subject == record.subject {
                1.0
            } else {
                0.0
            }
        }));
        row
    }

    /// Fit vocabulary and scaling on `records` and return the scaled
    /// feature matrix with its parallel `effectiveness` targets.
    ///
    /// The encoder is only updated when encoding succeeds.
    ///
    /// # Errors
    /// Returns [`TrainingError::EmptyBatch`] for an empty slice and
    /// [`TrainingError::NonFiniteTarget`] if any target is NaN or infinite.
    pub fn encode(
        &mut self,
        records: &[SessionRecord],
    ) -> Result<(FeatureMatrix, Vec<f64>), TrainingError> {
        if records.is_empty() {
            return Err(TrainingError::EmptyBatch);
        }

        let targets = records
            .iter()
            .enumerate()
            .map(|(index, r)| {
                if r.effectiveness.is_finite() {
                    Ok(r.effectiveness)
                } else {
                    Err(TrainingError::NonFiniteTarget { index })
                }
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let mut vocabulary: Vec<String> = Vec::new();
        for record in records {
            if !vocabulary.contains(&record.subject) {
                vocabulary.push(record.subject.clone());
            }
        }

        let raw: Vec<Vec<f64>> = records
            .iter()
            .map(|r| Self::raw_row(r, &vocabulary))
            .collect();
        let width = NUMERIC_COLUMNS.len() + vocabulary.len();
        let n = raw.len();

        let scaling: Vec<ColumnScaling> = (0..width)
            .map(|col| ColumnScaling::fit(raw.iter().map(move |row| row[col]), n))
            .collect();

        let scaled = Self::scale_rows(&raw, &scaling);
        let matrix = FeatureMatrix::new(Self::column_names(&vocabulary), scaled, n)?;

        self.vocabulary = vocabulary;
        self.scaling = scaling;
        Ok((matrix, targets))
    }

    /// Encode `records` with the vocabulary and statistics from the last fit.
    ///
    /// Subjects outside the fitted vocabulary get all-zero indicators before
    /// scaling. Targets are ignored.
    ///
    /// # Errors
    /// Returns [`TrainingError::NotTrained`] before the first successful fit.
    pub fn transform(&self, records: &[SessionRecord]) -> Result<FeatureMatrix, TrainingError> {
        if !self.is_fitted() {
            return Err(TrainingError::NotTrained);
        }
        let raw: Vec<Vec<f64>> = records
            .iter()
            .map(|r| Self::raw_row(r, &self.vocabulary))
            .collect();
        let scaled = Self::scale_rows(&raw, &self.scaling);
        FeatureMatrix::new(self.columns(), scaled, raw.len())
    }

    fn scale_rows(raw: &[Vec<f64>], scaling: &[ColumnScaling]) -> Vec<f64> {
        raw.iter()
            .flat_map(|row| row.iter().zip(scaling).map(|(v, s)| s.apply(*v)))
            .collect()
    }
}
