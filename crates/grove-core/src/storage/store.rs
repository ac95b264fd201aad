//! Stats model and the store capability the session controller persists to.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Cumulative stats kept across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Sessions completed since the last abort.
    pub streak: u64,
    /// Whole focused minutes over all completed sessions.
    pub total_minutes: u64,
}

impl Stats {
    pub fn new(streak: u64, total_minutes: u64) -> Self {
        Self {
            streak,
            total_minutes,
        }
    }

    /// Credit a completed session. Partial minutes are dropped.
    pub fn record_completion(&mut self, duration_secs: u64) {
        self.streak = self.streak.saturating_add(1);
        self.total_minutes = self.total_minutes.saturating_add(duration_secs / 60);
    }

    /// An abandoned session breaks the streak; focused minutes are kept.
    pub fn record_abort(&mut self) {
        self.streak = 0;
    }
}

/// Durable storage for [`Stats`].
///
/// Single writer, last write wins. Implementations report failures; the
/// controller decides to swallow them.
pub trait StatsStore {
    fn load(&self) -> Result<Stats, PersistenceError>;

    fn save(&mut self, stats: &Stats) -> Result<(), PersistenceError>;

    /// Load, falling back to zeroed stats on any failure.
    fn load_or_default(&self) -> Stats {
        match self.load() {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "could not load stats, starting from zero");
                Stats::default()
            }
        }
    }
}

impl<S: StatsStore + ?Sized> StatsStore for Box<S> {
    fn load(&self) -> Result<Stats, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, stats: &Stats) -> Result<(), PersistenceError> {
        (**self).save(stats)
    }
}

/// In-process store.
///
/// Used when embedding the controller without durable storage and in tests.
/// `failing` makes every call return [`PersistenceError::Unavailable`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStatsStore {
    stats: Option<Stats>,
    failing: bool,
    saves: usize,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(stats: Stats) -> Self {
        Self {
            stats: Some(stats),
            ..Self::default()
        }
    }

    /// A store whose reads and writes all fail.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Last successfully saved value.
    pub fn stored(&self) -> Option<Stats> {
        self.stats
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Result<Stats, PersistenceError> {
        if self.failing {
            return Err(PersistenceError::Unavailable("memory store set to fail".into()));
        }
        Ok(self.stats.unwrap_or_default())
    }

    fn save(&mut self, stats: &Stats) -> Result<(), PersistenceError> {
        if self.failing {
            return Err(PersistenceError::Unavailable("memory store set to fail".into()));
        }
        self.stats = Some(*stats);
        self.saves += 1;
        Ok(())
    }
}
