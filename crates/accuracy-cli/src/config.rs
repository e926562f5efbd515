//! Configuration file loading.
//!
//! Defaults for the engine path and search settings come from an
//! optional `accuracy.toml` in the working directory; command-line
//! flags override whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from `accuracy.toml`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CliConfig {
    /// Path to the UCI engine executable.
    /// Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub engine_path: String,
    /// Default search depth per position.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Default time budget per position, in milliseconds.
    #[serde(default = "default_movetime_ms")]
    pub movetime_ms: u64,
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_depth() -> u32 {
    15
}

fn default_movetime_ms() -> u64 {
    2_000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            depth: default_depth(),
            movetime_ms: default_movetime_ms(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration from disk.
    ///
    /// If the file at [`Self::config_path()`] does not exist, returns
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be
    /// read, or [`ConfigError::Parse`] if it contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("accuracy.toml")
    }
}
