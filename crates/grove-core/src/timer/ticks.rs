//! Tick schedule capability.
//!
//! The session clock never sleeps or spawns anything itself. It asks a
//! [`TickSchedule`] to start a periodic schedule and gets back a token; the
//! host then delivers each tick back to the controller together with that
//! token. Ticks carrying a token that is no longer armed are dropped, which
//! is what keeps a late-queued tick from touching a finished session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resolution of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one armed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

impl TickToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of periodic ticks.
pub trait TickSchedule {
    /// Start a periodic schedule firing every `interval`.
    fn arm(&mut self, interval: Duration) -> TickToken;

    /// Stop the schedule identified by `token`. Must take effect before
    /// returning; unknown tokens are ignored.
    fn cancel(&mut self, token: TickToken);
}

impl<T: TickSchedule + ?Sized> TickSchedule for Box<T> {
    fn arm(&mut self, interval: Duration) -> TickToken {
        (**self).arm(interval)
    }

    fn cancel(&mut self, token: TickToken) {
        (**self).cancel(token)
    }
}

/// Hand-driven schedule for tests and for hosts that pump ticks themselves.
///
/// Keeps track of which token is currently armed; nothing fires on its own.
#[derive(Debug, Default)]
pub struct ManualTicks {
    next_id: u64,
    armed: Option<TickToken>,
    cancelled: Vec<TickToken>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the schedule currently running, if any.
    pub fn armed(&self) -> Option<TickToken> {
        self.armed
    }

    /// Every token cancelled so far, oldest first.
    pub fn cancelled(&self) -> &[TickToken] {
        &self.cancelled
    }

    /// How many schedules have been armed over the lifetime of this source.
    pub fn arm_count(&self) -> u64 {
        self.next_id
    }
}

impl TickSchedule for ManualTicks {
    fn arm(&mut self, _interval: Duration) -> TickToken {
        self.next_id += 1;
        let token = TickToken::new(self.next_id);
        self.armed = Some(token);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        if self.armed == Some(token) {
            self.armed = None;
        }
        self.cancelled.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_hands_out_fresh_tokens() {
        let mut ticks = ManualTicks::new();
        let a = ticks.arm(TICK_INTERVAL);
        let b = ticks.arm(TICK_INTERVAL);
        assert_ne!(a, b);
        assert_eq!(ticks.armed(), Some(b));
        assert_eq!(ticks.arm_count(), 2);
    }

    #[test]
    fn cancel_disarms_matching_token_only() {
        let mut ticks = ManualTicks::new();
        let a = ticks.arm(TICK_INTERVAL);
        let b = ticks.arm(TICK_INTERVAL);
        ticks.cancel(a);
        assert_eq!(ticks.armed(), Some(b));
        ticks.cancel(b);
        assert_eq!(ticks.armed(), None);
        assert_eq!(ticks.cancelled(), &[a, b]);
    }
}
