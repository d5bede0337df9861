//! Declarative command metadata.
//!
//! A [`CommandSpec`] describes one node of a command tree: its names, its
//! usage and help text, an optional completer, its children and the factory
//! that builds its handler. Specs are plain values assembled with a builder
//! and handed to the registry once.

use std::fmt;
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::{CommandHandler, FnHandler, HandlerFactory, UsageHandler};
use super::sender::CommandSender;
use crate::error::HandlerResult;

/// Input handed to a completer.
pub struct CompletionRequest<'a> {
    pub sender: &'a dyn CommandSender,
    /// Every argument after the label.
    pub args: &'a [String],
    /// The token being completed: the last argument, if any.
    pub current: Option<&'a str>,
}

/// Dynamic completion source for a node.
pub type Completer = Arc<dyn Fn(&CompletionRequest<'_>) -> Vec<String> + Send + Sync>;

/// Declarative description of one command node.
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) names: Vec<String>,
    pub(crate) usage: String,
    pub(crate) help: String,
    pub(crate) children: Vec<CommandSpec>,
    pub(crate) completer: Option<Completer>,
    pub(crate) factory: HandlerFactory,
}

impl CommandSpec {
    /// A node whose handler is produced by `factory` on every dispatch.
    ///
    /// The first name is canonical, the rest are aliases.
    pub fn new<I, S, F, H>(names: I, factory: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn() -> H + Send + Sync + 'static,
        H: CommandHandler + 'static,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            usage: String::new(),
            help: String::new(),
            children: Vec::new(),
            completer: None,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn CommandHandler>),
        }
    }

    /// A node whose handler is `H::default()`.
    pub fn of<H, I, S>(names: I) -> Self
    where
        H: CommandHandler + Default + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, H::default)
    }

    /// A node handled by a plain function of the context and the depth at
    /// which dispatch stopped.
    pub fn from_fn<I, S, F>(names: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&CommandContext<'_>, usize) -> HandlerResult + Clone + Send + Sync + 'static,
    {
        Self::new(names, move || FnHandler::new(f.clone()))
    }

    /// A grouping node: invoking it directly shows its usage.
    pub fn group<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of::<UsageHandler, _, _>(names)
    }

    pub fn usage(mut self, text: impl Into<String>) -> Self {
        self.usage = text.into();
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    pub fn child(mut self, spec: CommandSpec) -> Self {
        self.children.push(spec);
        self
    }

    pub fn children(mut self, specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        self.children.extend(specs);
        self
    }

    pub fn completer<F>(mut self, f: F) -> Self
    where
        F: Fn(&CompletionRequest<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.completer = Some(Arc::new(f));
        self
    }

    /// Declared names, as given.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("names", &self.names)
            .field("usage", &self.usage)
            .field("children", &self.children)
            .field("completer", &self.completer.is_some())
            .finish_non_exhaustive()
    }
}
