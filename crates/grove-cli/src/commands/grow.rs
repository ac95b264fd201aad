use std::io::BufRead;

use clap::Args;
use grove_core::{
    Command, Config, ConfigError, DriverHandle, EventLog, MemoryStatsStore, RunMode, SessionConfig,
    SessionDriver, SqliteStatsStore, StatsStore, Visibility,
};

use crate::view::TerminalView;

#[derive(Args)]
pub struct GrowArgs {
    /// Session length in minutes (defaults to session.duration_min)
    #[arg(short, long, allow_negative_numbers = true)]
    minutes: Option<i64>,
    /// Session length in seconds, for quick trial runs
    #[arg(long, hide = true, conflicts_with = "minutes")]
    seconds: Option<u64>,
    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,
}

/// Open the on-disk stats store, falling back to memory so that a broken
/// database never prevents a session.
pub fn open_store() -> Box<dyn StatsStore> {
    match SqliteStatsStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "stats store unavailable, this session will not be saved");
            Box::new(MemoryStatsStore::new())
        }
    }
}

fn parse_input(line: &str) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "p" | "pause" | "resume" => Some(Command::TogglePause),
        "q" | "quit" | "give up" => Some(Command::Abort),
        "h" | "hide" => Some(Command::Visibility(Visibility::Hidden)),
        "v" | "show" => Some(Command::Visibility(Visibility::Visible)),
        _ => None,
    }
}

/// Read line commands on a plain thread; stdin reads block and must not hold
/// up runtime shutdown once the session is over.
fn spawn_stdin_reader(handle: DriverHandle) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_input(&line) {
                Some(command) => {
                    if !handle.send(command) {
                        break;
                    }
                }
                None => eprintln!("unknown input '{}' (p = pause/resume, q = give up)", line.trim()),
            }
        }
    });
}

/// Run one session. An explicit length works even when the config file is
/// broken; falling back to `session.duration_min` needs a readable config.
pub fn run(
    args: GrowArgs,
    config: Result<Config, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = match (args.seconds, args.minutes) {
        (Some(secs), _) => SessionConfig::from_secs(secs),
        (None, Some(minutes)) => SessionConfig::from_minutes(minutes)?,
        (None, None) => config?.session_config()?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let log = runtime.block_on(async move {
        let (mut driver, handle) = SessionDriver::new(session, open_store());
        driver.subscribe(TerminalView::new(args.json));
        let log = EventLog::new();
        driver.subscribe(log.clone());

        handle.start(session);
        spawn_stdin_reader(handle.clone());

        let interrupt = handle.clone();
        tokio::spawn(async move {
            // Walking away with Ctrl-C counts as leaving the session.
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.visibility(Visibility::Hidden);
            }
        });

        driver.run(RunMode::SingleSession).await;
        log
    });

    if log.count("config_rejected") > 0 {
        return Err("session duration must be positive".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_commands() {
        assert_eq!(parse_input("p"), Some(Command::TogglePause));
        assert_eq!(parse_input(" Q "), Some(Command::Abort));
        assert_eq!(parse_input("give up"), Some(Command::Abort));
        assert_eq!(
            parse_input("hide"),
            Some(Command::Visibility(Visibility::Hidden))
        );
        assert_eq!(parse_input("dance"), None);
    }
}
