//! Command registry: registration, sealing and top-level routing.
//!
//! Registration and dispatch are separate phases with separate types.
//! [`RegistryBuilder`] is the only thing that can add commands; calling
//! [`RegistryBuilder::seal`] consumes it and yields a [`CommandRegistry`],
//! which has no mutating API and can be shared across threads freely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use plugcmd_line::fold;
use tracing::{debug, info, warn};

use super::context::CommandContext;
use super::node::CommandNode;
use super::sender::CommandSender;
use super::spec::CommandSpec;
use crate::config::{CommandsConfig, DuplicatePolicy};
use crate::error::ConfigurationError;
use crate::metrics;
use crate::telemetry::spans;

/// A registered root command and the plugin that owns it.
struct RootEntry {
    node: CommandNode,
    owner: String,
    /// Dispatches routed to this root, for `command_stats`.
    invocations: AtomicU64,
}

/// Registration phase: collects command trees.
pub struct RegistryBuilder {
    policy: DuplicatePolicy,
    roots: HashMap<String, Arc<RootEntry>>,
    entries: Vec<Arc<RootEntry>>,
    known_names: Vec<String>,
}

impl RegistryBuilder {
    /// Builder with the default duplicate policy (last registration wins).
    pub fn new() -> Self {
        Self::with_config(&CommandsConfig::default())
    }

    pub fn with_config(config: &CommandsConfig) -> Self {
        Self {
            policy: config.duplicate_names,
            roots: HashMap::new(),
            entries: Vec::new(),
            known_names: Vec::new(),
        }
    }

    /// Build `spec` into a tree and index every one of its names.
    ///
    /// Fails if any node in the tree is invalid, or if a root name is taken
    /// and the policy is [`DuplicatePolicy::Reject`]. A failed call leaves the
    /// builder unchanged.
    pub fn register(&mut self, spec: CommandSpec, owner: &str) -> Result<&mut Self, ConfigurationError> {
        let node = CommandNode::build(spec)?;

        if self.policy == DuplicatePolicy::Reject
            && let Some(taken) = node.names().iter().find(|n| self.roots.contains_key(*n))
        {
            return Err(ConfigurationError::DuplicateName(taken.clone()));
        }

        node.collect_names(&mut self.known_names);

        let entry = Arc::new(RootEntry {
            node,
            owner: owner.to_string(),
            invocations: AtomicU64::new(0),
        });

        for name in entry.node.names() {
            if let Some(previous) = self.roots.insert(name.clone(), Arc::clone(&entry)) {
                warn!(
                    command = %name,
                    previous_owner = %previous.owner,
                    owner = %owner,
                    "Command name already registered; replacing"
                );
            }
        }
        self.entries.push(entry);

        Ok(self)
    }

    /// End the registration phase.
    pub fn seal(self) -> CommandRegistry {
        metrics::set_registered_roots(self.entries.len());
        info!(
            roots = self.entries.len(),
            names = self.known_names.len(),
            "Command registry sealed"
        );
        CommandRegistry {
            roots: self.roots,
            entries: self.entries,
            known_names: self.known_names,
        }
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("policy", &self.policy)
            .field("roots", &self.entries.len())
            .field("known_names", &self.known_names.len())
            .finish_non_exhaustive()
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<CommandRegistry> = OnceLock::new();

/// Dispatch phase: read-only routing over the sealed command trees.
pub struct CommandRegistry {
    roots: HashMap<String, Arc<RootEntry>>,
    entries: Vec<Arc<RootEntry>>,
    known_names: Vec<String>,
}

impl CommandRegistry {
    /// Make this registry the process-wide instance. Succeeds once.
    pub fn install(self) -> Result<&'static CommandRegistry, ConfigurationError> {
        GLOBAL
            .set(self)
            .map_err(|_| ConfigurationError::AlreadyInstalled)?;
        GLOBAL.get().ok_or(ConfigurationError::AlreadyInstalled)
    }

    /// The process-wide registry, once installed.
    pub fn global() -> Option<&'static CommandRegistry> {
        GLOBAL.get()
    }

    fn root(&self, label: &str) -> Option<&RootEntry> {
        self.roots.get(&fold(label)).map(Arc::as_ref)
    }

    /// Root node answering to `label`, ignoring case.
    pub fn root_node(&self, label: &str) -> Option<&CommandNode> {
        self.root(label).map(|entry| &entry.node)
    }

    /// Root nodes in registration order, including roots whose names were
    /// all taken over by later registrations.
    pub fn root_nodes(&self) -> impl Iterator<Item = &CommandNode> {
        self.entries.iter().map(|entry| &entry.node)
    }

    /// Every name at every depth, in registration order.
    pub fn known_names(&self) -> &[String] {
        &self.known_names
    }

    /// Execute the invocation if `label` names a root.
    ///
    /// Returns `false` only when no root matches; once a root matches the
    /// result is `true` whatever the handler did.
    pub fn dispatch(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> bool {
        let Some(entry) = self.root(label) else {
            metrics::record_unknown_label();
            debug!(label = %label, sender = %sender.name(), "No command registered for label");
            return false;
        };

        entry.invocations.fetch_add(1, Ordering::Relaxed);
        let ctx = CommandContext::new(sender, label, args, &entry.owner);
        entry.node.execute(&ctx, 0);
        true
    }

    /// Completion suggestions for the invocation.
    ///
    /// An unknown label yields every known name.
    pub fn complete_for(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> Vec<String> {
        let span = spans::completion(label, sender.name());
        let _enter = span.enter();

        match self.root(label) {
            Some(entry) => {
                metrics::record_completion(true);
                let ctx = CommandContext::new(sender, label, args, &entry.owner);
                entry.node.complete(&ctx, 0)
            }
            None => {
                metrics::record_completion(false);
                self.known_names.clone()
            }
        }
    }

    /// Send usage text for the invocation. `false` if no root matches.
    pub fn usage_for(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> bool {
        match self.root(label) {
            Some(entry) => {
                let ctx = CommandContext::new(sender, label, args, &entry.owner);
                entry.node.usage(&ctx, 0);
                true
            }
            None => false,
        }
    }

    /// Send help text for the invocation. `false` if no root matches.
    pub fn help_for(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> bool {
        match self.root(label) {
            Some(entry) => {
                let ctx = CommandContext::new(sender, label, args, &entry.owner);
                entry.node.help(&ctx, 0);
                true
            }
            None => false,
        }
    }

    /// Host entry point for a raw command.
    pub fn on_invocation(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> bool {
        self.dispatch(sender, label, args)
    }

    /// Host entry point for interactive completion.
    pub fn on_completion_request(&self, sender: &dyn CommandSender, label: &str, args: &[String]) -> Vec<String> {
        self.complete_for(sender, label, args)
    }

    /// Get per-root dispatch counts, busiest first. Unused roots are omitted.
    pub fn command_stats(&self) -> Vec<(&str, u64)> {
        let mut stats: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.node.canonical(), entry.invocations.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.roots.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("roots", &names)
            .field("known_names", &self.known_names.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CapturingSender;
    use crate::error::CommandError;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn say(names: &[&str], text: &'static str) -> CommandSpec {
        CommandSpec::from_fn(names.to_vec(), move |ctx, _| {
            ctx.reply(text);
            Ok(())
        })
    }

    #[test]
    fn register_indexes_every_alias() {
        let mut builder = RegistryBuilder::new();
        builder.register(say(&["spawn", "s", "hub"], "spawned"), "core").unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        for label in ["spawn", "S", "HUB"] {
            assert!(registry.dispatch(&sender, label, &[]));
        }
        assert_eq!(sender.take(), vec!["spawned"; 3]);
        assert!(!registry.dispatch(&sender, "spawnpoint", &[]));
    }

    #[test]
    fn known_names_cover_every_depth_in_registration_order() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                CommandSpec::group(["home", "h"]).child(say(&["set"], "")).child(say(&["del"], "")),
                "homes",
            )
            .unwrap()
            .register(say(&["warp"], ""), "warps")
            .unwrap();
        let registry = builder.seal();

        assert_eq!(registry.known_names(), &["home", "h", "set", "del", "warp"]);

        let sender = CapturingSender::new("Steve");
        let fallback = registry.complete_for(&sender, "wa", &args(&[""]));
        assert_eq!(fallback, registry.known_names());
    }

    #[test]
    fn duplicate_names_overwrite_by_default() {
        let mut builder = RegistryBuilder::new();
        builder.register(say(&["tp"], "first"), "a").unwrap();
        builder.register(say(&["tp"], "second"), "b").unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        registry.dispatch(&sender, "tp", &[]);
        assert_eq!(sender.take(), vec!["second"]);
    }

    #[test]
    fn duplicate_names_rejected_when_configured() {
        let config = CommandsConfig {
            duplicate_names: DuplicatePolicy::Reject,
        };
        let mut builder = RegistryBuilder::with_config(&config);
        builder.register(say(&["tp", "teleport"], "first"), "a").unwrap();

        let err = builder.register(say(&["Teleport"], "second"), "b").unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateName("teleport".into()));

        // The failed registration left nothing behind
        let registry = builder.seal();
        assert_eq!(registry.known_names(), &["tp", "teleport"]);
    }

    #[test]
    fn invalid_spec_fails_registration() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register(CommandSpec::group(Vec::<&str>::new()), "bad")
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyNames);
    }

    #[test]
    fn owner_reaches_the_handler() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                CommandSpec::from_fn(["whoami"], |ctx, _| {
                    ctx.reply(&format!("{} via {}", ctx.owner(), ctx.label()));
                    Ok(())
                }),
                "essentials",
            )
            .unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        registry.dispatch(&sender, "WhoAmI", &[]);
        assert_eq!(sender.take(), vec!["essentials via WhoAmI"]);
    }

    #[test]
    fn usage_and_help_route_through_roots() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                CommandSpec::group(["home"])
                    .usage("/home <set|del>")
                    .help("Manage your homes")
                    .child(CommandSpec::group(["set"]).usage("/home set <name>")),
                "homes",
            )
            .unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        assert!(registry.help_for(&sender, "home", &[]));
        assert!(registry.usage_for(&sender, "home", &[]));
        assert!(!registry.usage_for(&sender, "warp", &[]));
        assert!(!registry.help_for(&sender, "warp", &[]));
        assert_eq!(
            sender.take(),
            vec!["Manage your homes", "/home <set|del>", "/home set <name>"]
        );
    }

    #[test]
    fn command_stats_count_dispatches_per_root() {
        let mut builder = RegistryBuilder::new();
        builder.register(say(&["tp"], ""), "a").unwrap();
        builder.register(say(&["tpa"], ""), "a").unwrap();
        builder.register(say(&["warp"], ""), "a").unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        registry.dispatch(&sender, "tpa", &[]);
        registry.dispatch(&sender, "TPA", &[]);
        registry.dispatch(&sender, "tp", &[]);

        assert_eq!(registry.command_stats(), vec![("tpa", 2), ("tp", 1)]);
    }

    #[test]
    fn failures_never_escape_dispatch() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                CommandSpec::from_fn(["boom"], |_, _| Err(CommandError::from(anyhow::anyhow!("boom")))),
                "a",
            )
            .unwrap()
            .register(CommandSpec::from_fn(["panic"], |_, _| panic!("handler bug")), "a")
            .unwrap();
        let registry = builder.seal();
        let sender = CapturingSender::new("Steve");

        assert!(registry.dispatch(&sender, "boom", &[]));
        assert!(registry.dispatch(&sender, "panic", &[]));
        assert!(sender.messages().is_empty());
    }

    #[test]
    fn debug_output_summarizes_roots() {
        let mut builder = RegistryBuilder::new();
        builder.register(say(&["warp", "w"], ""), "warps").unwrap();
        assert!(format!("{builder:?}").contains("known_names: 2"));

        let rendered = format!("{:?}", builder.seal());
        assert!(rendered.contains(r#"roots: ["w", "warp"]"#));
        assert!(rendered.contains("known_names: 2"));
    }

    #[test]
    fn sealed_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandRegistry>();
    }
}
