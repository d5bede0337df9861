//! Error types for the invocation line layer.

use thiserror::Error;

/// Convenience type alias for Results using [`LineError`].
pub type Result<T, E = LineError> = std::result::Result<T, E>;

/// Errors raised while reading or parsing a raw invocation line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line bytes were not valid UTF-8.
    #[error("invalid UTF-8 in line at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },

    /// Line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// The line carried no command label.
    #[error("missing command label")]
    MissingLabel,
}

impl LineError {
    /// Whether the stream can keep going after this error.
    ///
    /// Everything except I/O failure is confined to one line: the codec has
    /// already dropped the offending bytes.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
