//! plugcmd - hierarchical command dispatch and completion for game server plugins.
//!
//! Plugins describe command trees declaratively; the engine routes raw
//! invocations to a fresh handler at the deepest matching node, produces
//! tab-completion suggestions at any depth, and answers with usage text when
//! an invocation does not resolve.

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod metrics;
pub mod telemetry;

pub use command::{
    CommandContext, CommandHandler, CommandNode, CommandRegistry, CommandSender, CommandSpec,
    CompletionRequest, RegistryBuilder,
};
pub use error::{CommandError, ConfigurationError, HandlerResult};
