//! Terminal rendering of session events.

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use grove_core::{Event, SessionObserver};

/// `mm:ss`, minutes not capped at 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Wall-clock `HH:MM` in the local timezone.
pub fn format_local(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub struct TerminalView {
    json: bool,
}

impl TerminalView {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn render_json(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, kind = event.kind(), "could not encode event"),
        }
    }

    fn render_text(&self, event: &Event) {
        match event {
            Event::SessionStarted {
                duration_secs,
                stage,
                ..
            } => {
                println!(
                    "Planted a {}. {} to go. (p = pause/resume, q = give up)",
                    stage.label(),
                    format_clock(*duration_secs)
                );
            }
            Event::Tick {
                remaining_secs,
                stage,
                ..
            } => {
                print!("\r{}  {:<12}", format_clock(*remaining_secs), stage.label());
                if let Err(e) = std::io::stdout().flush() {
                    tracing::trace!(error = %e, "stdout flush failed");
                }
            }
            Event::Paused {
                paused,
                remaining_secs,
                ..
            } => {
                let what = if *paused { "Paused" } else { "Resumed" };
                println!("\r{what} at {}", format_clock(*remaining_secs));
            }
            Event::Completed {
                streak,
                total_minutes,
                at,
                ..
            } => {
                println!("\nTree fully grown at {}! Session complete.", format_local(at));
                println!("Streak: {streak}  Total focus: {total_minutes} min");
            }
            Event::Aborted {
                reason, streak, at, ..
            } => {
                println!("\n{} ({})", reason.description(), format_local(at));
                println!("Streak: {streak}");
            }
            Event::ConfigRejected { message, .. } => eprintln!("{message}"),
            Event::DurationChanged { .. } | Event::StateSnapshot { .. } => {}
        }
    }
}

impl SessionObserver for TerminalView {
    fn on_event(&mut self, event: &Event) {
        if self.json {
            self.render_json(event);
        } else {
            self.render_text(event);
        }
    }
}
