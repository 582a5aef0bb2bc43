//! TOML-based user settings.
//!
//! Stores:
//! - Default timer values offered when no input is given
//! - Lead time for the "almost done" cue
//! - Poll interval of the driver
//! - Which notifications the front end should produce
//!
//! Settings live at `~/.config/tickdown/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{TimerConfig, DEFAULT_LEAD_TIME_SECS};

/// Values used when the user does not supply their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDefaults {
    #[serde(default = "default_minutes")]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_break_secs")]
    pub break_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSettings {
    #[serde(default = "default_lead_time")]
    pub lead_time_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Ring the terminal bell for audio cues.
    #[serde(default = "default_true")]
    pub bell: bool,
    #[serde(default = "default_true")]
    pub toasts: bool,
    /// Celebrate a finished session.
    #[serde(default = "default_true")]
    pub confetti: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tickdown/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerDefaults,
    #[serde(default)]
    pub checkpoints: CheckpointSettings,
    #[serde(default)]
    pub driver: DriverSettings,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_minutes() -> u64 {
    5
}
fn default_rounds() -> u32 {
    1
}
fn default_break_secs() -> u64 {
    60
}
fn default_lead_time() -> u64 {
    DEFAULT_LEAD_TIME_SECS
}
fn default_poll_interval_ms() -> u64 {
    250
}
fn default_true() -> bool {
    true
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            minutes: default_minutes(),
            seconds: 0,
            rounds: default_rounds(),
            break_secs: default_break_secs(),
        }
    }
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            lead_time_secs: default_lead_time(),
        }
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            bell: true,
            toasts: true,
            confetti: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) => {
                    return Err(invalid("key names a section, not a value".into()))
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_failed(e.to_string()))
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Session config built from the stored defaults.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            duration_secs: self.timer.minutes * 60 + self.timer.seconds,
            round_count: self.timer.rounds.max(1),
            break_duration_secs: self.timer.break_secs,
        }
    }

    /// Poll interval, never below 10ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.driver.poll_interval_ms.max(10))
    }
}
