//! Recommendation policies.
//!
//! Two heuristics answer the same request shape:
//!
//! - [`EnergyDifficultyPolicy`]: the production rule. Picks from fixed option
//!   ladders using the gap between energy and difficulty, gated on whether
//!   the predictor has been trained.
//! - [`DefaultAdjustmentPolicy`]: the mock-service rule. Nudges the classic
//!   25/5 schedule for hard tasks and low energy, whatever the model state.
//!
//! Neither policy reads model predictions.

mod default_adjustment;
mod energy_difficulty;

pub use default_adjustment::DefaultAdjustmentPolicy;
pub use energy_difficulty::{
    EnergyDifficultyPolicy, InternalError, BREAK_OPTIONS, POMODORO_OPTIONS,
};

use serde::{Deserialize, Serialize};

use crate::session::{Recommendation, UserContext};

/// A strategy that turns user context into pomodoro settings.
///
/// Implementations never fail: internal problems map to a safe default.
pub trait RecommendationPolicy: Send + Sync {
    /// Stable identifier, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Recommend settings for `context`. `model_trained` reports whether
    /// the predictor has completed a fit.
    fn recommend(&self, context: &UserContext, model_trained: bool) -> Recommendation;
}

/// Named policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    EnergyDifficulty,
    DefaultAdjustment,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn RecommendationPolicy> {
        match self {
            PolicyKind::EnergyDifficulty => Box::new(EnergyDifficultyPolicy),
            PolicyKind::DefaultAdjustment => Box::new(DefaultAdjustmentPolicy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::EnergyDifficulty => "energy_difficulty",
            PolicyKind::DefaultAdjustment => "default_adjustment",
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "energy_difficulty" => Ok(PolicyKind::EnergyDifficulty),
            "default_adjustment" => Ok(PolicyKind::DefaultAdjustment),
            other => Err(format!(
                "unknown policy: {other} (expected energy-difficulty or default-adjustment)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_builds_matching_policy() {
        for kind in [PolicyKind::EnergyDifficulty, PolicyKind::DefaultAdjustment] {
            assert_eq!(kind.build().name(), kind.as_str());
        }
    }

    #[test]
    fn kind_parses_either_separator() {
        assert_eq!(
            "energy-difficulty".parse::<PolicyKind>(),
            Ok(PolicyKind::EnergyDifficulty)
        );
        assert_eq!(
            "Default_Adjustment".parse::<PolicyKind>(),
            Ok(PolicyKind::DefaultAdjustment)
        );
        assert!("random".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn policies_disagree_on_the_same_request() {
        let ctx = UserContext::with_levels(4, 5);
        let full = PolicyKind::EnergyDifficulty.build().recommend(&ctx, true);
        let mock = PolicyKind::DefaultAdjustment.build().recommend(&ctx, true);
        assert_ne!(full, mock);
    }
}
