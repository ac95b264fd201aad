//! Distraction detection.
//!
//! Leaving the focus window ends the session. Pausing does not protect
//! against this: a paused session is still active.

use serde::{Deserialize, Serialize};

use crate::session::{AbortReason, SessionPhase};

/// Visibility of the environment hosting the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Turns visibility changes into abort signals.
#[derive(Debug, Clone)]
pub struct AntiCheatMonitor {
    last: Visibility,
}

impl AntiCheatMonitor {
    pub fn new() -> Self {
        Self {
            last: Visibility::Visible,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.last
    }

    /// Forget earlier reports. Called when a session starts so that a hide
    /// seen before it, or during the previous session, cannot mask the next one.
    pub fn reset(&mut self) {
        self.last = Visibility::Visible;
    }

    /// Record a visibility report.
    ///
    /// Returns `Some(AbortReason::Distraction)` exactly when the environment
    /// goes from visible to hidden while `phase` is active. A repeated
    /// `Hidden` report is the same transition and yields nothing.
    pub fn observe(&mut self, visibility: Visibility, phase: SessionPhase) -> Option<AbortReason> {
        let became_hidden = self.last == Visibility::Visible && visibility == Visibility::Hidden;
        self.last = visibility;
        if became_hidden && phase.is_active() {
            tracing::debug!(?phase, "environment hidden during active session");
            Some(AbortReason::Distraction)
        } else {
            None
        }
    }
}

impl Default for AntiCheatMonitor {
    fn default() -> Self {
        Self::new()
    }
}
