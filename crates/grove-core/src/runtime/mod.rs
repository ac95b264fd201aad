mod driver;
mod ticks;

pub use driver::{Command, DriverHandle, RunMode, SessionDriver};
pub use ticks::TokioTicks;
