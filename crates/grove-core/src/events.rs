use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AbortReason, SessionPhase};
use crate::timer::Stage;

/// Every state change of a session produces an Event.
/// Presentation layers subscribe to them; nothing flows back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        duration_secs: u64,
        stage: Stage,
        at: DateTime<Utc>,
    },
    /// One second counted down.
    Tick {
        remaining_secs: u64,
        stage: Stage,
        at: DateTime<Utc>,
    },
    Paused {
        paused: bool,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The tree is fully grown.
    Completed {
        streak: u64,
        total_minutes: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The tree wilted.
    Aborted {
        reason: AbortReason,
        streak: u64,
        at: DateTime<Utc>,
    },
    /// A session length was refused; the session never started.
    ConfigRejected {
        requested_secs: i64,
        message: String,
        at: DateTime<Utc>,
    },
    /// The idle countdown now shows a new length.
    DurationChanged {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        remaining_secs: u64,
        duration_secs: u64,
        stage: Stage,
        streak: u64,
        total_minutes: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Wire name of the variant, as found in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::Tick { .. } => "tick",
            Event::Paused { .. } => "paused",
            Event::Completed { .. } => "completed",
            Event::Aborted { .. } => "aborted",
            Event::ConfigRejected { .. } => "config_rejected",
            Event::DurationChanged { .. } => "duration_changed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::Tick { at, .. }
            | Event::Paused { at, .. }
            | Event::Completed { at, .. }
            | Event::Aborted { at, .. }
            | Event::ConfigRejected { at, .. }
            | Event::DurationChanged { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    /// Session ended, either way.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Completed { .. } | Event::Aborted { .. })
    }
}
