mod anti_cheat;
mod clock;
mod stage;
mod ticks;

pub use anti_cheat::{AntiCheatMonitor, Visibility};
pub use clock::{ClockTick, SessionClock};
pub use stage::{progress, stage_for, wilted_stage, Stage, GROWTH_STAGES, STAGE_COUNT};
pub use ticks::{ManualTicks, TickSchedule, TickToken, TICK_INTERVAL};
