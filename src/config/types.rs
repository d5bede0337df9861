//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_log_filter, default_max_line_len, default_prompt, default_sender_name,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Command registration behavior.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Console host configuration.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive (default: "info").
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// What to do when a root name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later registration replaces the earlier one (logged as a warning).
    #[default]
    Overwrite,
    /// Registration fails with `ConfigurationError::DuplicateName`.
    Reject,
}

/// Command registration behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandsConfig {
    /// Policy for duplicate top-level names (default: overwrite).
    #[serde(default)]
    pub duplicate_names: DuplicatePolicy,
}

/// Console host configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Prompt printed before each line is read (default: "> ").
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Name the console sender reports to handlers (default: "console").
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// Maximum accepted input line length in bytes (default: 256).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            sender_name: default_sender_name(),
            max_line_len: default_max_line_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
        assert_eq!(config.commands.duplicate_names, DuplicatePolicy::Overwrite);
        assert_eq!(config.console.prompt, "> ");
        assert_eq!(config.console.sender_name, "console");
        assert_eq!(config.console.max_line_len, 256);
    }

    #[test]
    fn duplicate_policy_parses_lowercase() {
        let config: Config = toml::from_str("[commands]\nduplicate_names = \"reject\"\n").unwrap();
        assert_eq!(config.commands.duplicate_names, DuplicatePolicy::Reject);

        let err = toml::from_str::<Config>("[commands]\nduplicate_names = \"explode\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[console]\nprompt = \"$ \"\n").unwrap();
        assert_eq!(config.console.prompt, "$ ");
        assert_eq!(config.console.max_line_len, 256);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nfilter = \"plugcmd=debug\"\njson = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.logging.filter, "plugcmd=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn load_reports_io_and_parse_errors() {
        let missing = Config::load("/nonexistent/plugcmd.toml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[console\nprompt = 1").unwrap();
        let broken = Config::load(file.path());
        assert!(matches!(broken, Err(ConfigError::Parse(_))));
    }
}
