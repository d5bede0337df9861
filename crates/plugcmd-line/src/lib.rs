//! # plugcmd-line
//!
//! The raw text layer underneath the plugcmd command engine.
//!
//! ## Features
//!
//! - Parsing of raw invocation lines (`/home set base`) into a label and
//!   argument tokens, keeping empty tokens so that a trailing space means
//!   "complete the next argument"
//! - Case folding helpers shared by every case-insensitive comparison
//! - Optional Tokio line codec for hosts that read commands from a stream

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use plugcmd_line::Invocation;
//!
//! let inv = Invocation::parse("/home set base").expect("valid invocation");
//! assert_eq!(inv.label, "home");
//! assert_eq!(inv.args.as_slice(), &["set", "base"]);
//! ```

pub mod casemap;
pub mod error;
pub mod invocation;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::casemap::{eq_ignore_case, fold, starts_with_ignore_case};
pub use self::error::LineError;
pub use self::invocation::Invocation;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
