//! Hierarchical command dispatch and completion.
//!
//! This module contains the command tree, the registry that routes labels to
//! tree roots, and the handler contract driven at terminal nodes.
//!
//! ## Lifecycle
//!
//! 1. Plugins describe commands as [`CommandSpec`] trees.
//! 2. [`RegistryBuilder::register`] validates and builds each tree.
//! 3. [`RegistryBuilder::seal`] ends registration and returns the read-only
//!    [`CommandRegistry`]; [`CommandRegistry::install`] optionally makes it
//!    the process-wide instance.
//! 4. The host calls [`CommandRegistry::dispatch`] and
//!    [`CommandRegistry::complete_for`] for every line and completion request.
//!
//! ## Failure handling
//!
//! A terminal dispatch creates one [`CommandHandler`] and runs it inside a
//! boundary that maps [`CommandError`](crate::error::CommandError) kinds to
//! sender feedback. Nothing a handler does, including panicking, reaches the
//! host.

pub mod context;
pub mod handler;
pub mod node;
pub mod registry;
pub mod sender;
pub mod spec;

pub use context::CommandContext;
pub use handler::{CommandHandler, FnHandler, HandlerFactory, UsageHandler};
pub use node::CommandNode;
pub use registry::{CommandRegistry, RegistryBuilder};
pub use sender::{CapturingSender, ChannelSender, CommandSender};
pub use spec::{CommandSpec, Completer, CompletionRequest};
