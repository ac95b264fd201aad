mod config;
pub mod database;
mod store;

pub use config::{Config, LogSection, SessionSection};
pub use database::SqliteStatsStore;
pub use store::{MemoryStatsStore, Stats, StatsStore};

use std::path::PathBuf;

/// Returns the directory holding the config file and stats database.
///
/// `GROVE_HOME` overrides the location outright. Otherwise this is
/// `~/.config/grove[-dev]/`, with `GROVE_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("GROVE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("GROVE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("grove-dev")
            } else {
                base_dir.join("grove")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
