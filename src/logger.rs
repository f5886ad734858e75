use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `LLMPRINT_LOG=debug`
pub const LOG_ENV: &str = "LLMPRINT_LOG";

/// Install the global tracing subscriber; diagnostics go to stderr so they
/// never mix with rendered output.
pub fn initialize_logger() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to set global logger: {}", e);
    }
}
