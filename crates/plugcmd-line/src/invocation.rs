//! Nom-based invocation line parser.
//!
//! An invocation line is what a sender types: an optional leading `/`, the
//! command label, then arguments separated by single spaces.
//!
//! Arguments are split on every space, so empty tokens survive:
//!
//! - `home` has no arguments
//! - `home ` has one empty argument, which a host uses to ask for
//!   completions of the next token
//! - `home  set` has the arguments `["", "set"]`

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{opt, rest},
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::{LineError, Result};

/// Argument tokens borrowed from the parsed line.
pub type Args<'a> = SmallVec<[&'a str; 8]>;

/// A parsed invocation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Command label as typed, without the leading `/`.
    pub label: &'a str,
    /// Argument tokens after the label.
    pub args: Args<'a>,
}

/// Parse the label: optional `/`, then everything up to the first space.
fn parse_label(input: &str) -> IResult<&str, &str> {
    preceded(opt(char('/')), take_while1(|c| c != ' '))(input)
}

/// Parse the argument tail: a single space separator, then the rest verbatim.
fn parse_tail(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(char(' '), rest))(input)
}

impl<'a> Invocation<'a> {
    /// Parse a raw line. Trailing CR/LF is ignored.
    pub fn parse(line: &'a str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (remaining, label) = parse_label(line).map_err(|_| LineError::MissingLabel)?;
        let (_, tail) = parse_tail(remaining).map_err(|_| LineError::MissingLabel)?;

        let args = match tail {
            Some(tail) => tail.split(' ').collect(),
            None => SmallVec::new(),
        };

        Ok(Self { label, args })
    }

    /// Copy the argument tokens into owned strings.
    pub fn args_owned(&self) -> Vec<String> {
        self.args.iter().map(|s| s.to_string()).collect()
    }
}
