//! Classic-schedule adjustment policy used by the minimal service.

use super::RecommendationPolicy;
use crate::session::{Recommendation, UserContext};

const CONFIDENCE: f64 = 0.8;
const MIN_POMODORO: u32 = 15;

/// Starts from 25/5/15 and adjusts for hard tasks and low energy.
///
/// - difficulty above 3 adds 5 minutes per level, at most 10
/// - energy below 3 trims 5 minutes (floor 15) and lengthens the break by 2
///
/// The model state is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAdjustmentPolicy;

impl DefaultAdjustmentPolicy {
    pub fn adjust(&self, context: &UserContext) -> Recommendation {
        let mut rec = Recommendation::classic(CONFIDENCE);
        let difficulty = context.difficulty_or_default();
        let energy = context.energy_or_default();

        if difficulty > 3 {
            // levels above 3, capped at 2 steps
            let steps = difficulty.saturating_sub(3).min(2) as u32;
            rec.pomodoro_minutes += steps * 5;
        }
        if energy < 3 {
            rec.pomodoro_minutes = MIN_POMODORO.max(rec.pomodoro_minutes.saturating_sub(5));
            rec.break_minutes += 2;
        }
        rec
    }
}

impl RecommendationPolicy for DefaultAdjustmentPolicy {
    fn name(&self) -> &'static str {
        "default_adjustment"
    }

    fn recommend(&self, context: &UserContext, _model_trained: bool) -> Recommendation {
        self.adjust(context)
    }
}
