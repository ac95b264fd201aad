//! # Grove Core Library
//!
//! This library provides the core logic for Grove, a focus timer that grows
//! a tree while you concentrate. Finishing a session grows the tree and
//! extends your streak; giving up or leaving the focus window wilts it and
//! resets the streak.
//!
//! ## Architecture
//!
//! - **Session Controller**: an embeddable state machine with no threads of
//!   its own. Ticks, visibility changes and user commands are fed in by the
//!   host one at a time.
//! - **Timer**: countdown clock, growth-stage mapping and distraction
//!   detection, each usable on its own.
//! - **Storage**: SQLite-backed stats store and TOML-based configuration
//! - **Runtime**: tokio driver that hosts a controller with real timers
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core session state machine
//! - [`StatsStore`]: Persistence capability for streak and focused minutes
//! - [`TickSchedule`]: Injected tick source (manual in tests, tokio at runtime)
//! - [`SessionDriver`]: Async host for a controller

pub mod error;
pub mod events;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, PersistenceError};
pub use events::Event;
pub use runtime::{Command, DriverHandle, RunMode, SessionDriver, TokioTicks};
pub use session::{
    AbortReason, EventLog, SessionConfig, SessionController, SessionObserver, SessionPhase,
};
pub use storage::{Config, MemoryStatsStore, SqliteStatsStore, Stats, StatsStore};
pub use timer::{
    stage_for, wilted_stage, AntiCheatMonitor, ManualTicks, SessionClock, Stage, TickSchedule,
    TickToken, Visibility, STAGE_COUNT,
};
