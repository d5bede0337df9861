//! Runtime command tree and the dispatch algorithm.
//!
//! Every traversal (execute, complete, usage, help) walks the same way:
//! starting at some depth, the token at that depth is looked up among the
//! current node's children; on a match the walk moves into the child and the
//! depth advances by one. The walk stops at the first token that matches no
//! child, or when tokens run out. The node it stops at is the terminal node.
//!
//! Execute, usage and help match tokens case-insensitively. Completion
//! matches them exactly against the folded names, so a mixed-case token that
//! would dispatch into a child is completed at the parent instead.

use std::panic::{self, AssertUnwindSafe};

use plugcmd_line::{fold, starts_with_ignore_case};
use tracing::{debug, error, info};

use super::context::CommandContext;
use super::handler::HandlerFactory;
use super::spec::{CommandSpec, Completer, CompletionRequest};
use crate::error::{CommandError, ConfigurationError};
use crate::metrics;
use crate::telemetry::{CommandTimer, panic_message, spans};

/// How a token is compared against child names while descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    IgnoreCase,
    Exact,
}

/// One immutable node of a command tree.
pub struct CommandNode {
    /// First declared name, original casing.
    canonical: String,
    /// Canonical names from the root down, space separated ("home set").
    path: String,
    /// Folded names, first is canonical.
    names: Vec<String>,
    usage: String,
    help: String,
    children: Vec<CommandNode>,
    /// Every child's names, in declaration order.
    child_names: Vec<String>,
    completer: Option<Completer>,
    factory: HandlerFactory,
}

impl CommandNode {
    /// Build a tree from a spec, validating every node.
    pub fn build(spec: CommandSpec) -> Result<Self, ConfigurationError> {
        Self::build_under(spec, None)
    }

    fn build_under(spec: CommandSpec, parent: Option<&str>) -> Result<Self, ConfigurationError> {
        let CommandSpec {
            names: declared,
            usage,
            help,
            children,
            completer,
            factory,
        } = spec;

        let canonical = declared.first().cloned().ok_or(ConfigurationError::EmptyNames)?;

        let mut names: Vec<String> = Vec::with_capacity(declared.len());
        for name in &declared {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidName(name.clone()));
            }
            let folded = fold(name);
            if !names.contains(&folded) {
                names.push(folded);
            }
        }

        let path = match parent {
            Some(parent) => format!("{parent} {canonical}"),
            None => canonical.clone(),
        };

        let children = children
            .into_iter()
            .map(|child| Self::build_under(child, Some(&path)))
            .collect::<Result<Vec<_>, _>>()?;

        let child_names = children
            .iter()
            .flat_map(|child| child.names.iter().cloned())
            .collect();

        for name in &declared {
            info!(command = %name, path = %path, "Registered command");
        }

        Ok(Self {
            canonical,
            path,
            names,
            usage,
            help,
            children,
            child_names,
            completer,
            factory,
        })
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child_names(&self) -> &[String] {
        &self.child_names
    }

    /// Direct child answering to `token`, ignoring case.
    pub fn child(&self, token: &str) -> Option<&CommandNode> {
        self.find_child(token, Match::IgnoreCase)
    }

    /// Append this node's names and every descendant's, depth first.
    pub(crate) fn collect_names(&self, out: &mut Vec<String>) {
        out.extend(self.names.iter().cloned());
        for child in &self.children {
            child.collect_names(out);
        }
    }

    fn find_child(&self, token: &str, mode: Match) -> Option<&CommandNode> {
        match mode {
            Match::IgnoreCase => {
                let folded = fold(token);
                self.children.iter().find(|c| c.names.contains(&folded))
            }
            Match::Exact => self
                .children
                .iter()
                .find(|c| c.names.iter().any(|n| n == token)),
        }
    }

    /// Descend one token per level from `depth`; returns the terminal node and
    /// the depth at which it stopped.
    fn resolve(&self, args: &[String], depth: usize, mode: Match) -> (&CommandNode, usize) {
        let mut node = self;
        let mut depth = depth;
        while let Some(child) = args.get(depth).and_then(|token| node.find_child(token, mode)) {
            node = child;
            depth += 1;
        }
        (node, depth)
    }

    // ========================================================================
    // Execute
    // ========================================================================

    /// Route the invocation to exactly one terminal handler.
    ///
    /// Never fails and never panics past this call: handler failures become
    /// sender feedback or log records.
    pub fn execute(&self, ctx: &CommandContext<'_>, depth: usize) {
        let (node, depth) = self.resolve(ctx.args(), depth, Match::IgnoreCase);
        node.run_terminal(ctx, depth);
    }

    fn run_terminal(&self, ctx: &CommandContext<'_>, depth: usize) {
        let span = spans::command(&self.path, ctx.sender().name(), depth);
        let _enter = span.enter();
        let _timer = CommandTimer::new(self.path.as_str());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.invoke_handler(ctx, depth)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics::record_command_error(&self.path, "unhandled");
                error!(command = %self.path, sender = %ctx.sender().name(), error = ?e, "Unhandled command failure");
            }
            Err(payload) => {
                metrics::record_command_error(&self.path, "panic");
                error!(
                    command = %self.path,
                    sender = %ctx.sender().name(),
                    panic = %panic_message(payload.as_ref()),
                    "Command handler panicked"
                );
            }
        }
    }

    fn invoke_handler(&self, ctx: &CommandContext<'_>, depth: usize) -> anyhow::Result<()> {
        let mut handler = (self.factory)();

        let result = handler
            .initialize(ctx, depth)
            .and_then(|()| handler.execute(ctx));

        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        metrics::record_command_error(&self.path, err.error_code());
        debug!(command = %self.path, error = %err, "Command error");

        match err {
            CommandError::NoSuchCommand => {
                self.usage(ctx, depth);
                Ok(())
            }
            CommandError::Other(e) => handler.on_exception(ctx, e),
            other => {
                if let Some(text) = other.to_reply() {
                    ctx.reply(&text);
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Complete
    // ========================================================================

    /// Suggestions for the invocation: the terminal node's completer output
    /// followed by its child names that start with the token at the terminal
    /// depth. No deduplication.
    pub fn complete(&self, ctx: &CommandContext<'_>, depth: usize) -> Vec<String> {
        let (node, depth) = self.resolve(ctx.args(), depth, Match::Exact);
        node.suggest(ctx, depth)
    }

    fn suggest(&self, ctx: &CommandContext<'_>, depth: usize) -> Vec<String> {
        let args = ctx.args();
        let request = CompletionRequest {
            sender: ctx.sender(),
            args,
            current: args.last().map(String::as_str),
        };

        let mut suggestions = match &self.completer {
            Some(completer) => completer(&request),
            None => Vec::new(),
        };

        let prefix = args.get(depth).map_or("", String::as_str);
        suggestions.extend(
            self.child_names
                .iter()
                .filter(|name| starts_with_ignore_case(name, prefix))
                .cloned(),
        );
        suggestions
    }

    // ========================================================================
    // Usage / Help
    // ========================================================================

    /// Send the terminal node's usage line followed by each direct child's.
    pub fn usage(&self, ctx: &CommandContext<'_>, depth: usize) {
        let (node, _) = self.resolve(ctx.args(), depth, Match::IgnoreCase);
        ctx.reply(&node.usage);
        for child in &node.children {
            ctx.reply(&child.usage);
        }
    }

    /// Send this node's help text, or, when the token at `depth` names a
    /// child, that child's usage.
    pub fn help(&self, ctx: &CommandContext<'_>, depth: usize) {
        match ctx
            .args()
            .get(depth)
            .and_then(|token| self.find_child(token, Match::IgnoreCase))
        {
            Some(child) => child.usage(ctx, depth + 1),
            None => ctx.reply(&self.help),
        }
    }
}

impl std::fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("path", &self.path)
            .field("names", &self.names)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
