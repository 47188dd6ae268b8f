//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for cache and data directories.

use std::path::PathBuf;

const APPLICATION: &str = "sect";

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "sect.json";

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/sect/logs`
/// - Linux: `~/.cache/sect/logs` (or `$XDG_CACHE_HOME/sect/logs`)
/// - Windows: `%LOCALAPPDATA%\sect\logs`
/// - Fallback: `/tmp/sect/logs`
pub fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/sect"));

    base_dir.join("logs")
}

/// Get the platform-specific data directory
///
/// - macOS: `~/Library/Application Support/sect`
/// - Linux: `~/.local/share/sect` (or `$XDG_DATA_HOME/sect`)
/// - Windows: `%APPDATA%\sect`
/// - Fallback: `./save_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

/// Default location of the store file.
pub fn default_db_path() -> PathBuf {
    data_dir().join(DB_FILE_NAME)
}
