use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `GROVE_LOG` takes precedence over `RUST_LOG`; `default_level` (from the
/// config file) applies when neither is set.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env("GROVE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
