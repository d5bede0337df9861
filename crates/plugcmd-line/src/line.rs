//! Line-based codec for tokio.
//!
//! Reads newline-terminated invocation lines and writes newline-terminated
//! replies. Line endings are stripped on decode and appended on encode.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{LineError, Result};

/// Default maximum line length in bytes, matching a typical game chat box.
pub const DEFAULT_MAX_LEN: usize = 256;

/// Line-based codec that handles newline-terminated invocation lines.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length, excluding the line ending
    max_len: usize,
    /// Dropping the rest of an overlong line until its newline arrives
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum accepted line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a character is an illegal control character in a line.
///
/// Tab is tolerated; every other control character is rejected.
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    ch.is_control() && ch != '\t'
}

fn validate_line(s: &str) -> Result<()> {
    match s.chars().find(|&ch| is_illegal_control_char(ch)) {
        Some(ch) => Err(LineError::IllegalControlChar(ch)),
        None => Ok(()),
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LineError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if self.discarding {
            match src.iter().position(|b| *b == b'\n') {
                Some(offset) => {
                    src.advance(offset + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                None => {
                    src.clear();
                    return Ok(None);
                }
            }
        }

        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            let body = line
                .strip_suffix(b"\n")
                .map(|b| b.strip_suffix(b"\r").unwrap_or(b))
                .unwrap_or(&line[..]);

            if body.len() > self.max_len {
                return Err(LineError::LineTooLong {
                    actual: body.len(),
                    limit: self.max_len,
                });
            }

            let data = std::str::from_utf8(body)
                .map_err(|e| LineError::InvalidUtf8 {
                    byte_pos: e.valid_up_to(),
                })?
                .to_string();

            validate_line(&data)?;

            Ok(Some(data))
        } else {
            self.next_index = src.len();

            // +2 leaves room for a CRLF that has not arrived yet
            if src.len() > self.max_len + 2 {
                let actual = src.len();
                src.clear();
                self.next_index = 0;
                self.discarding = true;
                return Err(LineError::LineTooLong {
                    actual,
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // A final line without a terminator is still a line.
        if !src.is_empty() && !src.ends_with(b"\n") {
            src.extend_from_slice(b"\n");
        }
        self.decode(src)
    }
}

impl Encoder<String> for LineCodec {
    type Error = LineError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(msg.as_bytes());
        if !msg.ends_with('\n') {
            dst.extend_from_slice(b"\n");
        }
        Ok(())
    }
}
