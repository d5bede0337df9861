//! Per-invocation command context.

use std::str::FromStr;

use super::sender::CommandSender;
use crate::error::CommandError;

/// Everything a handler knows about the invocation it serves.
///
/// Created by the registry for a single dispatch and dropped when the
/// dispatch returns. Handlers must not retain it.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    sender: &'a dyn CommandSender,
    label: &'a str,
    args: &'a [String],
    owner: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        sender: &'a dyn CommandSender,
        label: &'a str,
        args: &'a [String],
        owner: &'a str,
    ) -> Self {
        Self {
            sender,
            label,
            args,
            owner,
        }
    }

    pub fn sender(&self) -> &'a dyn CommandSender {
        self.sender
    }

    /// The label exactly as the sender typed it (may be an alias, any case).
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Every argument token after the label, including the ones consumed
    /// while descending the tree.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Name of the plugin that registered the root command.
    pub fn owner(&self) -> &'a str {
        self.owner
    }

    /// Argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `depth` onwards; empty when `depth` is past the end.
    pub fn args_from(&self, depth: usize) -> &'a [String] {
        self.args.get(depth..).unwrap_or(&[])
    }

    /// Argument at `index`, or a validation failure naming the missing value.
    pub fn require_arg(&self, index: usize, name: &str) -> Result<&'a str, CommandError> {
        self.arg(index)
            .ok_or_else(|| CommandError::Validation(format!("missing argument: {name}")))
    }

    /// Convert the argument at `index` to `T`.
    ///
    /// A missing argument is a validation failure; a token that does not
    /// parse is a conversion failure.
    pub fn parse_arg<T: FromStr>(&self, index: usize, expected: &'static str) -> Result<T, CommandError> {
        let token = self.require_arg(index, expected)?;
        token
            .parse()
            .map_err(|_| CommandError::conversion(token, expected))
    }

    /// Send one line of feedback to the sender.
    pub fn reply(&self, text: &str) {
        self.sender.send_message(text);
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("sender", &self.sender.name())
            .field("label", &self.label)
            .field("args", &self.args)
            .field("owner", &self.owner)
            .finish()
    }
}
