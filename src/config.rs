//! Configuration for the kilo binary.
//!
//! Loaded from `~/.kilo/config.toml` when present. Only logging is
//! configurable; the editor itself behaves the same regardless.
//!
//! ```toml
//! [log]
//! enabled = true
//! # error, warn, info, debug, trace
//! level = "info"
//! # defaults to ~/.kilo/kilo.log
//! file = "/tmp/kilo.log"
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
}

/// Log file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load the configuration file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(path) = config_dir().map(|dir| dir.join("config.toml")) {
            if let Ok(content) = fs::read_to_string(&path) {
                return Self::from_toml(&content).unwrap_or_default();
            }
        }
        Self::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl LogConfig {
    /// Parsed log level; unknown names mean `info`.
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }

    /// Where the log goes.
    pub fn path(&self) -> PathBuf {
        self.file
            .clone()
            .or_else(|| config_dir().map(|dir| dir.join("kilo.log")))
            .unwrap_or_else(|| PathBuf::from("kilo.log"))
    }
}

/// `~/.kilo`
fn config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kilo"))
}
