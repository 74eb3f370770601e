//! Configuration management for the feedback sentiment services.
//!
//! Configuration lives at `~/.feedback-sentiment/config.json`. A missing file
//! is not an error; every field has a default.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (FEEDBACK_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `FEEDBACK_LOG_LEVEL` → observability.log_level
//! - `FEEDBACK_LOG_FORMAT` → observability.log_format
//! - `FEEDBACK_MAX_CHARS` → classifier.max_chars

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Hard cap on the number of characters the classifier looks at.
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".feedback-sentiment"),
        |dirs| dirs.home_dir().join(".feedback-sentiment"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Classifier tuning
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable fallbacks.
    ///
    /// An explicit `path` must exist; the default path may be absent.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FEEDBACK_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("FEEDBACK_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(raw) = lookup("FEEDBACK_MAX_CHARS") {
            match raw.trim().parse() {
                Ok(n) => self.classifier.max_chars = n,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid FEEDBACK_MAX_CHARS"),
            }
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Aliases: "level"
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    /// Aliases: "format"
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============================================================================
// Classifier Configuration
// ============================================================================

/// Classifier tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Characters kept after whitespace normalization.
    ///
    /// This is a safety cap, not a semantic limit: anything past it is
    /// dropped before matching.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}
fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
