//! Session countdown.
//!
//! One-second resolution countdown on top of a [`TickSchedule`]. The clock
//! owns the schedule token: it arms a schedule when a session starts and
//! cancels it on expiry or reset, so at most one schedule is ever live.
//!
//! ```text
//! Disarmed --arm--> Armed --(tick x duration)--> Expired (schedule cancelled)
//!                     |  ^
//!                 pause  resume
//! ```

use super::ticks::{TickSchedule, TickToken, TICK_INTERVAL};

/// Outcome of delivering one tick to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Stale token, paused, or not armed: nothing changed.
    Ignored,
    /// One second counted down; time is still left.
    Counted { remaining_secs: u64 },
    /// The countdown reached zero. Reported once; the schedule is already
    /// cancelled when this is returned.
    Expired,
}

#[derive(Debug)]
pub struct SessionClock<T> {
    ticks: T,
    token: Option<TickToken>,
    duration_secs: u64,
    remaining_secs: u64,
    paused: bool,
}

impl<T: TickSchedule> SessionClock<T> {
    pub fn new(ticks: T, duration_secs: u64) -> Self {
        Self {
            ticks,
            token: None,
            duration_secs,
            remaining_secs: duration_secs,
            paused: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn token(&self) -> Option<TickToken> {
        self.token
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down `duration_secs`. Any previous schedule is
    /// cancelled first.
    pub fn arm(&mut self, duration_secs: u64) -> TickToken {
        self.cancel_schedule();
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.paused = false;
        let token = self.ticks.arm(TICK_INTERVAL);
        self.token = Some(token);
        token
    }

    /// Change the idle duration. Has no effect while armed.
    pub fn set_duration(&mut self, duration_secs: u64) -> bool {
        if self.is_armed() {
            return false;
        }
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_armed() || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.is_armed() || !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    pub fn on_tick(&mut self, token: TickToken) -> ClockTick {
        if self.token != Some(token) {
            tracing::trace!(token = token.id(), "dropping tick from inactive schedule");
            return ClockTick::Ignored;
        }
        if self.paused {
            return ClockTick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.cancel_schedule();
            return ClockTick::Expired;
        }
        ClockTick::Counted {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Cancel any live schedule and rewind to the full duration.
    pub fn reset(&mut self) {
        self.cancel_schedule();
        self.paused = false;
        self.remaining_secs = self.duration_secs;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_schedule(&mut self) {
        if let Some(token) = self.token.take() {
            self.ticks.cancel(token);
        }
    }
}
