mod controller;
mod observer;
mod state;

pub use controller::SessionController;
pub use observer::{EventLog, SessionObserver};
pub use state::{AbortReason, SessionConfig, SessionPhase, DEFAULT_DURATION_MIN};
