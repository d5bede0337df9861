//! Configuration loading and management.
//!
//! - [`types`]: Config struct definitions (Config, LoggingConfig, CommandsConfig, ConsoleConfig)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup validation returning every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{CommandsConfig, Config, ConfigError, ConsoleConfig, DuplicatePolicy, LoggingConfig};
pub use validation::{ValidationError, validate};
