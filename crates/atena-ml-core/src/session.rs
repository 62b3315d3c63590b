//! Session data model.
//!
//! [`SessionRecord`] is a completed study session with its measured
//! effectiveness, used for training and feedback. [`UserContext`] is the
//! subset a caller knows before the session starts. [`Recommendation`] is
//! what a policy hands back.

use serde::{Deserialize, Serialize};

/// Mid-scale value substituted for a missing difficulty or energy level.
pub const DEFAULT_LEVEL: i32 = 3;

/// A completed study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Hour of day (0-23)
    pub time_of_day: u8,
    /// Day of week (0-6)
    pub day_of_week: u8,
    /// Subject studied; any string, vocabulary is open
    pub subject: String,
    /// Task difficulty (1-5)
    pub difficulty: u8,
    /// Self-reported energy (1-5)
    pub energy_level: u8,
    /// Self-reported focus (1-5)
    pub focus_score: u8,
    /// Work interval length in minutes
    pub session_length: u32,
    /// Break length in minutes
    pub break_length: u32,
    /// Training target (0.0-1.0)
    pub effectiveness: f64,
}

/// What is known about a session before it starts.
///
/// Only `difficulty` and `energy_level` influence any policy today; the rest
/// is accepted so callers can send the same shape they log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<i32>,
}

impl UserContext {
    /// Context carrying only the two levels the policies read.
    pub fn with_levels(difficulty: i32, energy_level: i32) -> Self {
        Self {
            difficulty: Some(difficulty),
            energy_level: Some(energy_level),
            ..Self::default()
        }
    }

    /// Difficulty, or [`DEFAULT_LEVEL`] when absent.
    pub fn difficulty_or_default(&self) -> i32 {
        self.difficulty.unwrap_or(DEFAULT_LEVEL)
    }

    /// Energy level, or [`DEFAULT_LEVEL`] when absent.
    pub fn energy_or_default(&self) -> i32 {
        self.energy_level.unwrap_or(DEFAULT_LEVEL)
    }
}

/// Recommended pomodoro settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub pomodoro_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
    /// Self-reported certainty (0.0-1.0), not a calibrated probability
    pub confidence: f64,
}

impl Recommendation {
    /// The classic 25/5/15 schedule with four sessions per long break.
    pub const fn classic(confidence: f64) -> Self {
        Self {
            pomodoro_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            confidence,
        }
    }
}
