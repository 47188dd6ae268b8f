//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::RuntimeConfig;

use crate::dirs;

/// Configuration required to bootstrap the store, runtime and logging.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Store file; `None` selects the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Log filter directive, e.g. `debug` or `runtime=trace`.
    pub log_level: Option<String>,
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SECT_DB_PATH` - Store file location (default: platform data dir)
    /// - `LOG_LEVEL` - Log filter, falls back to `RUST_LOG` (default: info)
    /// - `ROOT_MAX_ATTEMPTS` - Draw budget for target-constrained roots (default: 100000)
    /// - `TICK_INTERVAL_MS` - Milliseconds between time ticks (default: 1000)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.db_path = env::var("SECT_DB_PATH").ok().map(PathBuf::from);

        config.log_level = env::var("LOG_LEVEL")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .filter(|level| !level.trim().is_empty());

        if let Some(attempts) = read_env::<u32>("ROOT_MAX_ATTEMPTS") {
            config.runtime.max_root_attempts = attempts.max(1);
        }

        if let Some(millis) = read_env::<u64>("TICK_INTERVAL_MS") {
            config.runtime.tick_interval = Duration::from_millis(millis.max(1));
        }

        config
    }

    /// Store file to open.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(dirs::default_db_path)
    }

    /// Effective log filter directive.
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
