//! Core error types for tickdown-core.
//!
//! The countdown itself never fails: invalid commands are no-ops and clock
//! faults pause the engine. These types cover the edges around it (settings
//! files, clock reads, presentation listeners).

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not locate the home directory or create the data directory
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dotted key does not name a setting
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// The clock could not produce a usable timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// System time reads earlier than the Unix epoch
    #[error("system clock is before the Unix epoch ({0} ms)")]
    BeforeEpoch(i64),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failure reported by a presentation listener.
///
/// Listener failures are logged and dropped by the dispatcher; they never
/// reach the countdown.
#[derive(Error, Debug)]
#[error("{listener}: {message}")]
pub struct ListenerError {
    pub listener: String,
    pub message: String,
}

impl ListenerError {
    pub fn new(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            message: message.into(),
        }
    }
}
