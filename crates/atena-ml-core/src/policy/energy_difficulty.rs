//! Energy/difficulty ladder policy.
//!
//! With a trained predictor the gap between energy and difficulty picks a
//! rung on two fixed ladders: more energy than difficulty means longer work
//! intervals. Without one, or if the arithmetic goes wrong, the classic
//! schedule is returned at medium confidence.

use thiserror::Error;
use tracing::{error, warn};

use super::RecommendationPolicy;
use crate::session::{Recommendation, UserContext};

/// Work interval options in minutes, shortest first.
pub const POMODORO_OPTIONS: [u32; 7] = [15, 20, 25, 30, 35, 40, 45];

/// Short break options in minutes, shortest first.
pub const BREAK_OPTIONS: [u32; 4] = [3, 5, 7, 10];

const FALLBACK_CONFIDENCE: f64 = 0.5;
const TRAINED_CONFIDENCE: f64 = 0.7;
const MIN_LONG_BREAK: u32 = 15;

/// Failures inside the ladder computation. Never escapes the policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("energy/difficulty arithmetic overflowed (energy {energy}, difficulty {difficulty})")]
    Overflow { energy: i32, difficulty: i32 },

    #[error("ladder index {0} is not finite")]
    NonFiniteIndex(f64),

    #[error("no option at index {index} of {len}")]
    MissingOption { index: usize, len: usize },
}

/// Production policy; see the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyDifficultyPolicy;

impl EnergyDifficultyPolicy {
    /// The untrained/failure answer: 25/5/15, four sessions, confidence 0.5.
    pub fn fallback() -> Recommendation {
        Recommendation::classic(FALLBACK_CONFIDENCE)
    }

    /// Ladder computation for a trained predictor.
    ///
    /// # Errors
    /// Fails on arithmetic overflow from extreme levels or a non-finite
    /// ladder index.
    pub fn try_recommend(&self, context: &UserContext) -> Result<Recommendation, InternalError> {
        let energy = context.energy_or_default();
        let difficulty = context.difficulty_or_default();

        let gap = energy
            .checked_sub(difficulty)
            .and_then(|d| d.checked_add(5))
            .ok_or(InternalError::Overflow { energy, difficulty })?;
        let factor = f64::from(gap) / 5.0;

        let pomodoro_minutes = pick(
            &POMODORO_OPTIONS,
            factor * POMODORO_OPTIONS.len() as f64 - 1.0,
        )?;
        let break_minutes = pick(
            &BREAK_OPTIONS,
            (6.0 - factor) * BREAK_OPTIONS.len() as f64 / 5.0,
        )?;

        Ok(Recommendation {
            pomodoro_minutes,
            break_minutes,
            long_break_minutes: MIN_LONG_BREAK.max(break_minutes.saturating_mul(2)),
            sessions_until_long_break: if energy > 3 { 4 } else { 3 },
            confidence: TRAINED_CONFIDENCE,
        })
    }
}

/// Round `raw` down and clamp it into `options`.
fn pick(options: &[u32], raw: f64) -> Result<u32, InternalError> {
    if !raw.is_finite() {
        return Err(InternalError::NonFiniteIndex(raw));
    }
    let last = options.len().saturating_sub(1);
    let index = raw.floor().clamp(0.0, last as f64) as usize;
    options
        .get(index)
        .copied()
        .ok_or(InternalError::MissingOption {
            index,
            len: options.len(),
        })
}

impl RecommendationPolicy for EnergyDifficultyPolicy {
    fn name(&self) -> &'static str {
        "energy_difficulty"
    }

    fn recommend(&self, context: &UserContext, model_trained: bool) -> Recommendation {
        if !model_trained {
            warn!("Model not trained, returning default recommendations");
            return Self::fallback();
        }

        match self.try_recommend(context) {
            Ok(recommendation) => recommendation,
            Err(e) => {
                error!(error = %e, "Error generating recommendation");
                Self::fallback()
            }
        }
    }
}
