//! Logging setup for the `sect` binary.
use anyhow::Result;
use client_bootstrap::{AppConfig, dirs};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "sect.log";

/// Setup logging to both stderr and file
///
/// Command output goes to stdout, so the stderr layer never interleaves with
/// the JSON envelopes.
pub fn setup_logging(config: &AppConfig) -> Result<()> {
    let log_dir = dirs::log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let file_layer = fmt::layer().with_writer(non_blocking_file).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(_guard);

    tracing::debug!("Log file: {}", log_dir.join(LOG_FILE).display());
    Ok(())
}
