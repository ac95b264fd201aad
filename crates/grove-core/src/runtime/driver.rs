//! Async host for a session controller.
//!
//! The driver owns the controller and is the only place it is touched.
//! Commands from the user, visibility reports and ticks all arrive on
//! channels and are applied one at a time, so each input runs to completion
//! before the next is looked at. Commands win over ticks when both are
//! ready.

use tokio::sync::mpsc;

use super::ticks::TokioTicks;
use crate::error::ConfigError;
use crate::session::{AbortReason, SessionConfig, SessionController, SessionObserver};
use crate::storage::StatsStore;
use crate::timer::{TickToken, Visibility};

/// Inputs accepted by a running [`SessionDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start(SessionConfig),
    StartConfigured,
    Pause,
    Resume,
    TogglePause,
    /// The user gives up.
    Abort,
    /// New session length in minutes; idle only.
    SetDuration(i64),
    Visibility(Visibility),
    /// Stop the driver. An active session is abandoned as a give-up.
    Shutdown,
}

/// When [`SessionDriver::run`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Keep going until `Shutdown` or every handle is dropped.
    UntilShutdown,
    /// Return as soon as the first session finishes either way.
    SingleSession,
}

/// Cloneable sender for driver commands.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl DriverHandle {
    /// Queue a command. Returns `false` once the driver has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn start(&self, config: SessionConfig) -> bool {
        self.send(Command::Start(config))
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(Command::TogglePause)
    }

    pub fn give_up(&self) -> bool {
        self.send(Command::Abort)
    }

    pub fn visibility(&self, visibility: Visibility) -> bool {
        self.send(Command::Visibility(visibility))
    }

    pub fn shutdown(&self) -> bool {
        self.send(Command::Shutdown)
    }
}

pub struct SessionDriver<S> {
    controller: SessionController<S, TokioTicks>,
    ticks: mpsc::UnboundedReceiver<TickToken>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<S: StatsStore> SessionDriver<S> {
    pub fn new(config: SessionConfig, store: S) -> (Self, DriverHandle) {
        let (ticks, tick_rx) = TokioTicks::new();
        let (tx, commands) = mpsc::unbounded_channel();
        let driver = Self {
            controller: SessionController::new(config, store, ticks),
            ticks: tick_rx,
            commands,
        };
        (driver, DriverHandle { tx })
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.controller.subscribe(observer);
    }

    pub fn controller(&self) -> &SessionController<S, TokioTicks> {
        &self.controller
    }

    /// Process inputs until `mode` says to stop. Hands the controller back
    /// so the caller can read the final stats.
    pub async fn run(mut self, mode: RunMode) -> SessionController<S, TokioTicks> {
        let mut started = false;
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => {
                        self.controller.abort(AbortReason::UserRequested);
                        break;
                    }
                    Some(command) => {
                        if let Err(e) = self.apply(command) {
                            tracing::debug!(error = %e, ?command, "command refused");
                            let is_start =
                                matches!(command, Command::Start(_) | Command::StartConfigured);
                            if is_start && mode == RunMode::SingleSession && !started {
                                break;
                            }
                        }
                    }
                },
                Some(token) = self.ticks.recv() => {
                    self.controller.on_tick(token);
                }
            }

            started |= self.controller.is_active();
            if mode == RunMode::SingleSession && started && !self.controller.is_active() {
                break;
            }
        }
        self.controller
    }

    fn apply(&mut self, command: Command) -> Result<(), ConfigError> {
        match command {
            Command::Start(config) => self.controller.start(config)?,
            Command::StartConfigured => self.controller.start_configured()?,
            Command::Pause => {
                self.controller.pause();
            }
            Command::Resume => {
                self.controller.resume();
            }
            Command::TogglePause => {
                self.controller.toggle_pause();
            }
            Command::Abort => {
                self.controller.request_abort();
            }
            Command::SetDuration(minutes) => self.controller.set_duration(minutes)?,
            Command::Visibility(visibility) => {
                self.controller.on_visibility(visibility);
            }
            Command::Shutdown => {}
        }
        Ok(())
    }
}
