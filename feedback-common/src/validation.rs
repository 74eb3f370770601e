//! Configuration validation.
//!
//! Checks that configured values are within the ranges the services accept.

use thiserror::Error;

use crate::config::{ClassifierConfig, Config, ObservabilityConfig};

/// Accepted log levels.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted log formats.
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.classifier.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Config {
    /// Load, apply environment overrides, and validate.
    pub fn load_and_validate(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let config = Self::load_with_env(path)
            .map_err(|e| crate::error::Error::Config(format!("{e:#}")))?;
        config
            .validate()
            .map_err(|e| crate::error::Error::Config(e.to_string()))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("'{}' is not one of {}", self.log_level, LOG_LEVELS.join(", ")),
            });
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!(
                    "'{}' is not one of {}",
                    self.log_format,
                    LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl Validate for ClassifierConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.max_chars == 0 {
            return Err(ValidationError::InvalidValue {
                field: "classifier.max_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}
