//! Session controller.
//!
//! Ties the countdown, the growth stage, distraction detection and the stats
//! store into one session lifecycle. Like the rest of the core it has no
//! threads of its own: the host feeds it commands, ticks and visibility
//! changes one at a time, and every call runs to completion.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |          |
//!            +-> Completed | Aborted -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(config, store, ticks);
//! controller.subscribe(view);
//! controller.start_configured()?;
//! // For every tick the schedule delivers:
//! controller.on_tick(token);
//! ```

use chrono::Utc;

use super::observer::SessionObserver;
use super::state::{AbortReason, SessionConfig, SessionPhase};
use crate::error::ConfigError;
use crate::events::Event;
use crate::storage::{Stats, StatsStore};
use crate::timer::{
    stage_for, wilted_stage, AntiCheatMonitor, ClockTick, SessionClock, Stage, TickSchedule,
    TickToken, Visibility,
};

pub struct SessionController<S, T> {
    config: SessionConfig,
    phase: SessionPhase,
    stage: Stage,
    stats: Stats,
    store: S,
    clock: SessionClock<T>,
    monitor: AntiCheatMonitor,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: StatsStore, T: TickSchedule> SessionController<S, T> {
    /// Create an idle controller. Stats are loaded from `store` once, here.
    pub fn new(config: SessionConfig, store: S, ticks: T) -> Self {
        let stats = store.load_or_default();
        tracing::debug!(
            streak = stats.streak,
            total_minutes = stats.total_minutes,
            "loaded stats"
        );
        Self {
            config,
            phase: SessionPhase::Idle,
            stage: Stage::seed(),
            stats,
            store,
            clock: SessionClock::new(ticks, config.duration_secs),
            monitor: AntiCheatMonitor::new(),
            observers: Vec::new(),
        }
    }

    /// Register an event consumer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn duration_secs(&self) -> u64 {
        self.clock.duration_secs()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ticks(&self) -> &T {
        self.clock.ticks()
    }

    /// Token of the live tick schedule, if a session is active.
    pub fn tick_token(&self) -> Option<TickToken> {
        self.clock.token()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs(),
            duration_secs: self.duration_secs(),
            stage: self.stage,
            streak: self.stats.streak,
            total_minutes: self.stats.total_minutes,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session of `config.duration_secs`.
    ///
    /// Ignored while a session is already active.
    ///
    /// # Errors
    /// A zero duration is refused: the controller stays idle and emits
    /// `ConfigRejected`.
    pub fn start(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        if self.is_active() {
            tracing::debug!(phase = ?self.phase, "start ignored, session already active");
            return Ok(());
        }
        if config.duration_secs == 0 {
            let err = ConfigError::NonPositiveDuration { minutes: 0 };
            self.reject(0, &err);
            return Err(err);
        }

        self.config = config;
        self.clock.arm(config.duration_secs);
        self.monitor.reset();
        self.phase = SessionPhase::Running;
        self.stage = stage_for(config.duration_secs, config.duration_secs);
        tracing::debug!(duration_secs = config.duration_secs, "session started");
        self.emit(Event::SessionStarted {
            duration_secs: config.duration_secs,
            stage: self.stage,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Start a session with the duration chosen through [`set_duration`].
    ///
    /// [`set_duration`]: Self::set_duration
    pub fn start_configured(&mut self) -> Result<(), ConfigError> {
        self.start(self.config)
    }

    /// Choose the length of the next session. Only allowed while idle.
    ///
    /// # Errors
    /// `SessionActive` while a session runs (no event); `NonPositiveDuration`
    /// for zero or negative minutes (emits `ConfigRejected`).
    pub fn set_duration(&mut self, minutes: i64) -> Result<(), ConfigError> {
        if self.is_active() {
            tracing::debug!(minutes, "duration change refused during session");
            return Err(ConfigError::SessionActive);
        }
        let config = match SessionConfig::from_minutes(minutes) {
            Ok(config) => config,
            Err(err) => {
                self.reject(minutes.saturating_mul(60), &err);
                return Err(err);
            }
        };
        self.config = config;
        self.clock.set_duration(config.duration_secs);
        self.emit(Event::DurationChanged {
            duration_secs: config.duration_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running || !self.clock.pause() {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.emit(Event::Paused {
            paused: true,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        });
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused || !self.clock.resume() {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.emit(Event::Paused {
            paused: false,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        });
        true
    }

    /// Pause a running session or resume a paused one.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            SessionPhase::Running => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// The user gives up.
    pub fn request_abort(&mut self) -> bool {
        self.abort(AbortReason::UserRequested)
    }

    /// End the active session early. Returns `false` when nothing was active.
    pub fn abort(&mut self, reason: AbortReason) -> bool {
        if !self.is_active() {
            return false;
        }
        // Tear the schedule down before anything else so a queued tick
        // cannot reach this session again.
        self.clock.reset();
        self.phase = SessionPhase::Aborted;
        self.stage = wilted_stage();
        self.stats.record_abort();
        self.persist();
        self.phase = SessionPhase::Idle;
        tracing::info!(?reason, streak = self.stats.streak, "session aborted");
        self.emit(Event::Aborted {
            reason,
            streak: self.stats.streak,
            at: Utc::now(),
        });
        true
    }

    /// Report a visibility change of the hosting environment.
    pub fn on_visibility(&mut self, visibility: Visibility) -> bool {
        match self.monitor.observe(visibility, self.phase) {
            Some(reason) => self.abort(reason),
            None => false,
        }
    }

    /// Deliver one tick from the schedule identified by `token`.
    ///
    /// Returns `true` if the tick counted.
    pub fn on_tick(&mut self, token: TickToken) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.clock.on_tick(token) {
            ClockTick::Ignored => false,
            ClockTick::Counted { remaining_secs } => {
                self.stage = stage_for(remaining_secs, self.clock.duration_secs());
                self.emit(Event::Tick {
                    remaining_secs,
                    stage: self.stage,
                    at: Utc::now(),
                });
                true
            }
            ClockTick::Expired => {
                self.stage = stage_for(0, self.clock.duration_secs());
                self.emit(Event::Tick {
                    remaining_secs: 0,
                    stage: self.stage,
                    at: Utc::now(),
                });
                self.phase = SessionPhase::Completed;
                self.complete();
                true
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) {
        let duration_secs = self.clock.duration_secs();
        self.stage = Stage::fully_grown();
        self.stats.record_completion(duration_secs);
        self.persist();
        self.clock.reset();
        self.phase = SessionPhase::Idle;
        tracing::info!(
            streak = self.stats.streak,
            total_minutes = self.stats.total_minutes,
            "session completed"
        );
        self.emit(Event::Completed {
            streak: self.stats.streak,
            total_minutes: self.stats.total_minutes,
            duration_secs,
            at: Utc::now(),
        });
    }

    fn reject(&mut self, requested_secs: i64, err: &ConfigError) {
        tracing::debug!(requested_secs, error = %err, "session config rejected");
        self.emit(Event::ConfigRejected {
            requested_secs,
            message: err.to_string(),
            at: Utc::now(),
        });
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.stats) {
            tracing::warn!(error = %e, "failed to persist stats, keeping them in memory");
        }
    }

    fn emit(&mut self, event: Event) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EventLog;
    use crate::storage::MemoryStatsStore;
    use crate::timer::{ManualTicks, STAGE_COUNT};

    type Controller = SessionController<MemoryStatsStore, ManualTicks>;

    fn controller() -> (Controller, EventLog) {
        let mut c = SessionController::new(
            SessionConfig::default(),
            MemoryStatsStore::new(),
            ManualTicks::new(),
        );
        let log = EventLog::new();
        c.subscribe(log.clone());
        (c, log)
    }

    fn tick_n(c: &mut Controller, n: u64) {
        for _ in 0..n {
            let token = c.ticks().armed().unwrap_or(TickToken::new(0));
            c.on_tick(token);
        }
    }

    #[test]
    fn start_pause_resume() {
        let (mut c, _) = controller();
        assert_eq!(c.phase(), SessionPhase::Idle);

        c.start(SessionConfig::from_secs(60)).unwrap();
        assert_eq!(c.phase(), SessionPhase::Running);
        assert_eq!(c.stage(), Stage::seed());

        assert!(c.pause());
        assert_eq!(c.phase(), SessionPhase::Paused);
        assert!(!c.pause());

        assert!(c.resume());
        assert_eq!(c.phase(), SessionPhase::Running);
        assert!(!c.resume());
    }

    #[test]
    fn start_while_active_is_ignored() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 5);
        c.start(SessionConfig::from_secs(10)).unwrap();
        assert_eq!(c.remaining_secs(), 55);
        assert_eq!(c.duration_secs(), 60);
        assert_eq!(log.count("session_started"), 1);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let (mut c, log) = controller();
        let err = c.start(SessionConfig::from_secs(0)).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveDuration { .. }));
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.ticks().arm_count(), 0);
        assert_eq!(log.count("config_rejected"), 1);
    }

    #[test]
    fn ticks_grow_the_tree() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(8)).unwrap();
        let stages: Vec<_> = (0..7)
            .map(|_| {
                tick_n(&mut c, 1);
                c.stage().index().unwrap()
            })
            .collect();
        assert_eq!(stages, vec![0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(log.count("tick"), 7);
        assert!(c.is_active());
    }

    #[test]
    fn completion_updates_and_persists_stats() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(120)).unwrap();
        tick_n(&mut c, 120);

        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.stage(), Stage::Growth(STAGE_COUNT - 1));
        assert_eq!(c.stats(), Stats::new(1, 2));
        assert_eq!(c.store().stored(), Some(Stats::new(1, 2)));
        assert_eq!(c.remaining_secs(), 120);
        assert_eq!(c.ticks().armed(), None);

        let events = log.events();
        match &events[events.len() - 2] {
            Event::Tick { remaining_secs, .. } => assert_eq!(*remaining_secs, 0),
            other => panic!("Expected final Tick, got {other:?}"),
        }
        match events.last() {
            Some(Event::Completed {
                streak,
                total_minutes,
                duration_secs,
                ..
            }) => {
                assert_eq!(*streak, 1);
                assert_eq!(*total_minutes, 2);
                assert_eq!(*duration_secs, 120);
            }
            other => panic!("Expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn abort_while_paused_wilts() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 60);
        assert_eq!(c.stats().streak, 1);

        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 10);
        c.pause();
        assert!(c.request_abort());

        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.stage(), Stage::Wilted);
        assert_eq!(c.stats(), Stats::new(0, 1));
        assert_eq!(c.remaining_secs(), 60);
        match log.last() {
            Some(Event::Aborted { reason, streak, .. }) => {
                assert_eq!(reason, AbortReason::UserRequested);
                assert_eq!(streak, 0);
            }
            other => panic!("Expected Aborted, got {other:?}"),
        }
    }

    #[test]
    fn hidden_window_aborts_even_when_paused() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(60)).unwrap();
        c.pause();
        assert!(c.on_visibility(Visibility::Hidden));
        assert_eq!(c.stage(), Stage::Wilted);
        assert!(matches!(
            log.last(),
            Some(Event::Aborted {
                reason: AbortReason::Distraction,
                ..
            })
        ));
    }

    #[test]
    fn visibility_is_ignored_while_idle() {
        let (mut c, log) = controller();
        assert!(!c.on_visibility(Visibility::Hidden));
        assert!(!c.on_visibility(Visibility::Visible));
        assert!(log.is_empty());
    }

    #[test]
    fn abort_cancels_schedule_synchronously() {
        let (mut c, _) = controller();
        c.start(SessionConfig::from_secs(60)).unwrap();
        let token = c.tick_token().unwrap();
        c.request_abort();
        assert_eq!(c.ticks().armed(), None);
        assert_eq!(c.ticks().cancelled(), &[token]);
        assert!(!c.on_tick(token));
    }

    #[test]
    fn set_duration_only_while_idle() {
        let (mut c, log) = controller();
        c.set_duration(10).unwrap();
        assert_eq!(c.remaining_secs(), 600);
        assert_eq!(log.count("duration_changed"), 1);

        c.start_configured().unwrap();
        assert!(matches!(c.set_duration(5), Err(ConfigError::SessionActive)));
        assert_eq!(c.duration_secs(), 600);

        c.request_abort();
        assert!(c.set_duration(0).is_err());
        assert!(c.set_duration(-3).is_err());
        assert_eq!(log.count("config_rejected"), 2);
        assert_eq!(c.config().duration_secs, 600);
    }

    #[test]
    fn loads_existing_stats_once() {
        let store = MemoryStatsStore::with_stats(Stats::new(5, 100));
        let mut c = SessionController::new(SessionConfig::default(), store, ManualTicks::new());
        assert_eq!(c.stats(), Stats::new(5, 100));

        c.start(SessionConfig::from_secs(25 * 60)).unwrap();
        tick_n(&mut c, 25 * 60);
        assert_eq!(c.stats(), Stats::new(6, 125));
    }

    #[test]
    fn save_failure_still_reports_outcome() {
        let mut c = SessionController::new(
            SessionConfig::default(),
            MemoryStatsStore::failing(),
            ManualTicks::new(),
        );
        let log = EventLog::new();
        c.subscribe(log.clone());
        assert_eq!(c.stats(), Stats::default());

        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 60);
        assert_eq!(c.stats(), Stats::new(1, 1));
        assert_eq!(c.store().stored(), None);
        assert_eq!(log.count("completed"), 1);
    }

    #[test]
    fn save_failure_still_reports_abort() {
        let mut c = SessionController::new(
            SessionConfig::default(),
            MemoryStatsStore::failing(),
            ManualTicks::new(),
        );
        let log = EventLog::new();
        c.subscribe(log.clone());

        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 60);
        c.start(SessionConfig::from_secs(60)).unwrap();
        tick_n(&mut c, 10);
        assert!(c.request_abort());

        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.stats(), Stats::new(0, 1));
        assert_eq!(c.store().stored(), None);
        match log.last() {
            Some(Event::Aborted { reason, streak, .. }) => {
                assert_eq!(reason, AbortReason::UserRequested);
                assert_eq!(streak, 0);
            }
            other => panic!("Expected Aborted, got {other:?}"),
        }
    }

    #[test]
    fn hide_while_idle_does_not_shield_next_session() {
        let (mut c, log) = controller();
        assert!(!c.on_visibility(Visibility::Hidden));

        c.start(SessionConfig::from_secs(60)).unwrap();
        assert!(c.on_visibility(Visibility::Hidden));
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(log.count("aborted"), 1);
    }

    #[test]
    fn every_session_catches_its_first_hide() {
        let (mut c, log) = controller();
        c.start(SessionConfig::from_secs(60)).unwrap();
        assert!(c.on_visibility(Visibility::Hidden));

        c.start(SessionConfig::from_secs(1)).unwrap();
        tick_n(&mut c, 1);
        assert_eq!(c.stats().streak, 1);

        c.start(SessionConfig::from_secs(60)).unwrap();
        assert!(c.on_visibility(Visibility::Hidden));
        assert_eq!(c.stats().streak, 0);
        assert_eq!(log.count("aborted"), 2);
    }

    #[test]
    fn toggle_pause_flips_between_running_and_paused() {
        let (mut c, log) = controller();
        assert!(!c.toggle_pause());
        c.start(SessionConfig::from_secs(60)).unwrap();
        assert!(c.toggle_pause());
        assert_eq!(c.phase(), SessionPhase::Paused);
        assert!(c.toggle_pause());
        assert_eq!(c.phase(), SessionPhase::Running);
        let flags: Vec<bool> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Paused { paused, .. } => Some(*paused),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let (c, _) = controller();
        match c.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                stage,
                ..
            } => {
                assert_eq!(phase, SessionPhase::Idle);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(stage, Stage::seed());
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
