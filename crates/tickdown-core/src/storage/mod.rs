mod config;

pub use config::{CheckpointSettings, Config, DriverSettings, NotificationsConfig, TimerDefaults};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tickdown[-dev]/` based on TICKDOWN_ENV.
///
/// Set TICKDOWN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TICKDOWN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tickdown-dev")
    } else {
        base_dir.join("tickdown")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
