use clap::Subcommand;
use grove_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-path key
    Get {
        /// "session.duration_min" or "log.level"
        key: String,
    },
    /// Change one value; session lengths must be positive
    Set {
        key: String,
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Print the whole configuration as JSON
    List,
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::file_path()?.display());
        }
        ConfigAction::Reset => {
            let config = Config::reset()?;
            println!(
                "config reset: session.duration_min = {}, log.level = {}",
                config.session.duration_min, config.log.level
            );
        }
    }
    Ok(())
}
