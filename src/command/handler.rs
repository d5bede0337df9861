//! The handler contract the engine drives at a terminal node.
//!
//! A node never holds a handler. It holds a [`HandlerFactory`] and asks it
//! for a fresh instance on every terminal dispatch, so per-invocation state
//! parsed in `initialize` cannot leak between senders.

use std::sync::Arc;

use super::context::CommandContext;
use crate::error::{CommandError, HandlerResult};

/// A request-scoped command implementation.
///
/// The engine calls `initialize`, then `execute` if initialization succeeded,
/// and `on_exception` only for [`CommandError::Other`] failures. Each method
/// runs at most once per instance.
pub trait CommandHandler {
    /// Parse and validate `ctx.args_from(depth)` into typed fields.
    ///
    /// `depth` is the index of the first argument that was not consumed as a
    /// subcommand name.
    fn initialize(&mut self, ctx: &CommandContext<'_>, depth: usize) -> HandlerResult {
        let _ = (ctx, depth);
        Ok(())
    }

    /// Perform the command.
    fn execute(&mut self, ctx: &CommandContext<'_>) -> HandlerResult;

    /// Last-resort recovery for unexpected failures.
    ///
    /// The default re-raises; the engine logs whatever comes back.
    fn on_exception(&mut self, ctx: &CommandContext<'_>, error: anyhow::Error) -> anyhow::Result<()> {
        let _ = ctx;
        Err(error)
    }
}

/// Produces one handler instance per terminal dispatch.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn CommandHandler> + Send + Sync>;

/// Handler backed by a plain function of the context and depth.
pub struct FnHandler<F> {
    f: F,
    depth: usize,
}

impl<F> FnHandler<F>
where
    F: Fn(&CommandContext<'_>, usize) -> HandlerResult,
{
    pub fn new(f: F) -> Self {
        Self { f, depth: 0 }
    }
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&CommandContext<'_>, usize) -> HandlerResult,
{
    fn initialize(&mut self, _ctx: &CommandContext<'_>, depth: usize) -> HandlerResult {
        self.depth = depth;
        Ok(())
    }

    fn execute(&mut self, ctx: &CommandContext<'_>) -> HandlerResult {
        (self.f)(ctx, self.depth)
    }
}

/// Handler for grouping nodes with no action of their own: always answers
/// with the node's usage.
#[derive(Debug, Default)]
pub struct UsageHandler;

impl CommandHandler for UsageHandler {
    fn execute(&mut self, _ctx: &CommandContext<'_>) -> HandlerResult {
        Err(CommandError::NoSuchCommand)
    }
}
