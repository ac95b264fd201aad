use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Session length used when nothing else is configured.
pub const DEFAULT_DURATION_MIN: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    /// Transient: folds back to `Idle` within the same call.
    Completed,
    /// Transient: folds back to `Idle` within the same call.
    Aborted,
}

impl SessionPhase {
    /// Running or paused. Distraction detection applies in both.
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Running | SessionPhase::Paused)
    }
}

/// Why a session ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The user gave up.
    UserRequested,
    /// The focus window was hidden while the session was active.
    Distraction,
}

impl AbortReason {
    pub fn description(&self) -> &'static str {
        match self {
            AbortReason::UserRequested => "You gave up. The tree wilted.",
            AbortReason::Distraction => "Distraction detected! The tree has wilted.",
        }
    }
}

/// Length of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub duration_secs: u64,
}

impl SessionConfig {
    pub fn from_secs(duration_secs: u64) -> Self {
        Self { duration_secs }
    }

    /// Build from a user-supplied minute count.
    ///
    /// # Errors
    /// Zero and negative values are rejected.
    pub fn from_minutes(minutes: i64) -> Result<Self, ConfigError> {
        if minutes <= 0 {
            return Err(ConfigError::NonPositiveDuration { minutes });
        }
        Ok(Self {
            duration_secs: (minutes as u64).saturating_mul(60),
        })
    }

    /// Whole minutes, rounded down.
    pub fn duration_min(&self) -> u64 {
        self.duration_secs / 60
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_MIN * 60,
        }
    }
}
