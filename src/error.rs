//! Unified error handling for plugcmd.
//!
//! Two families live here: [`CommandError`], raised by handlers and resolved
//! inside the engine for a single invocation, and [`ConfigurationError`],
//! raised while building or installing a command tree.

use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Failures a handler may raise from `initialize` or `execute`.
///
/// None of these ever leave the engine: the terminal node maps each kind to
/// sender feedback or to the handler's exception hook.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The arguments do not resolve to a valid leaf action.
    /// The engine answers with the node's usage text.
    #[error("no such command")]
    NoSuchCommand,

    /// The arguments have the wrong shape; the message goes to the sender.
    #[error("{0}")]
    Validation(String),

    /// A token could not be converted to the expected type.
    #[error("'{token}' is not a valid {expected}")]
    Conversion {
        token: String,
        expected: &'static str,
    },

    /// Anything else. Forwarded to the handler's `on_exception` hook.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommandError {
    /// Shorthand for a [`CommandError::Validation`] failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a [`CommandError::Conversion`] failure.
    pub fn conversion(token: impl Into<String>, expected: &'static str) -> Self {
        Self::Conversion {
            token: token.into(),
            expected,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSuchCommand => "no_such_command",
            Self::Validation(_) => "validation",
            Self::Conversion { .. } => "conversion",
            Self::Other(_) => "other",
        }
    }

    /// The text sent straight to the sender for this failure.
    ///
    /// Returns `None` for failures that are answered some other way
    /// (usage display, exception hook).
    pub fn to_reply(&self) -> Option<String> {
        match self {
            Self::Validation(_) | Self::Conversion { .. } => Some(self.to_string()),
            Self::NoSuchCommand | Self::Other(_) => None,
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), CommandError>;

// ============================================================================
// Configuration Errors (registration)
// ============================================================================

/// Errors raised while building a command tree or installing a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("command spec has no names")]
    EmptyNames,

    #[error("invalid command name {0:?}: names must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("command name {0:?} is already registered")]
    DuplicateName(String),

    #[error("a command registry is already installed")]
    AlreadyInstalled,
}
