//! Data directory layout.

use std::path::{Path, PathBuf};

use parley_types::config::ParleyConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
/// 3. `.parley` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}

/// Message store file: `{data_dir}/{storage.messages_file}`.
pub fn messages_path(data_dir: &Path, config: &ParleyConfig) -> PathBuf {
    data_dir.join(&config.storage.messages_file)
}

/// Request log file: `{data_dir}/{storage.requests_file}`.
pub fn requests_path(data_dir: &Path, config: &ParleyConfig) -> PathBuf {
    data_dir.join(&config.storage.requests_file)
}

/// Prompt directory: `conversation.prompts_dir` if set (relative paths are
/// taken from the data directory), else `{data_dir}/prompts`.
pub fn prompts_dir(data_dir: &Path, config: &ParleyConfig) -> PathBuf {
    match &config.conversation.prompts_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => data_dir.join(dir),
        None => data_dir.join("prompts"),
    }
}
