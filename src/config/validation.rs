//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("console.sender_name must not be empty")]
    EmptySenderName,
    #[error("console.max_line_len must be greater than zero")]
    ZeroLineLength,
    #[error("logging.filter is not a valid filter directive: {0}")]
    InvalidLogFilter(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.console.sender_name.trim().is_empty() {
        errors.push(ValidationError::EmptySenderName);
    }
    if config.console.max_line_len == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }
    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(ValidationError::InvalidLogFilter(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
