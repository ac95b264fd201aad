use clap::{Parser, Subcommand};
use grove_core::storage::LogSection;
use grove_core::Config;

mod commands;
mod logging;
mod view;

#[derive(Parser)]
#[command(name = "grove", version, about = "Grove focus timer CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a tree: run one focus session in this terminal
    Grow(commands::grow::GrowArgs),
    /// Print streak and total focused minutes as JSON
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // A config that fails to load is reported through the subscriber.
    let loaded = Config::load();
    match &loaded {
        Ok(config) => logging::init(&config.log.level),
        Err(e) => {
            logging::init(&LogSection::default().level);
            tracing::warn!(error = %e, "config unreadable, using the default log level");
        }
    }

    let result = match cli.command {
        Commands::Grow(args) => commands::grow::run(args, loaded),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
