//! Built-in sample plugin for the console host.
//!
//! `home`, `warp`, `tp`, `tpa`, `give`, `help`, `stats` and `metrics`. The
//! game-world side is a small in-memory store; the point is to drive every
//! engine path from a real host.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use plugcmd_line::{eq_ignore_case, starts_with_ignore_case};

use crate::command::{
    CommandContext, CommandHandler, CommandRegistry, CommandSpec, CompletionRequest,
    RegistryBuilder,
};
use crate::error::{CommandError, ConfigurationError, HandlerResult};
use crate::metrics;

/// Owner name reported for every command in this plugin.
pub const OWNER: &str = "essentials";

/// Longest accepted home alias, in characters.
pub const MAX_ALIAS_LEN: usize = 16;

/// Home aliases per sender.
#[derive(Debug, Default)]
pub struct HomeBook {
    homes: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl HomeBook {
    pub fn set(&self, owner: &str, alias: &str) -> bool {
        self.homes
            .write()
            .entry(owner.to_string())
            .or_default()
            .insert(alias.to_string())
    }

    pub fn remove(&self, owner: &str, alias: &str) -> bool {
        self.homes
            .write()
            .get_mut(owner)
            .is_some_and(|set| set.remove(alias))
    }

    pub fn list(&self, owner: &str) -> Vec<String> {
        self.homes
            .read()
            .get(owner)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Register the whole plugin.
pub fn register_all(
    builder: &mut RegistryBuilder,
    homes: Arc<HomeBook>,
    warps: Vec<String>,
) -> Result<(), ConfigurationError> {
    let warps = Arc::new(warps);
    builder
        .register(home_spec(homes), OWNER)?
        .register(warp_spec(warps), OWNER)?
        .register(teleport_spec(), OWNER)?
        .register(teleport_request_spec(), OWNER)?
        .register(give_spec(), OWNER)?
        .register(help_spec(), OWNER)?
        .register(stats_spec(), OWNER)?
        .register(metrics_spec(), OWNER)?;
    Ok(())
}

// ============================================================================
// home
// ============================================================================

fn home_spec(homes: Arc<HomeBook>) -> CommandSpec {
    let set_book = Arc::clone(&homes);
    let del_book = Arc::clone(&homes);
    let del_names = Arc::clone(&homes);
    let list_book = homes;

    CommandSpec::group(["home", "h"])
        .usage("/home <set|del|list>")
        .help("Save named homes and manage them.")
        .child(
            CommandSpec::new(["set", "add"], move || SetHome {
                book: Arc::clone(&set_book),
                alias: String::new(),
            })
            .usage("/home set <alias>")
            .help("Save your current position under an alias."),
        )
        .child(
            CommandSpec::new(["del", "delete"], move || DelHome {
                book: Arc::clone(&del_book),
                alias: String::new(),
            })
            .usage("/home del <alias>")
            .help("Forget a saved home.")
            .completer(move |req| home_names(&del_names, req)),
        )
        .child(
            CommandSpec::from_fn(["list"], move |ctx, _| {
                let homes = list_book.list(ctx.sender().name());
                if homes.is_empty() {
                    ctx.reply("You have no homes.");
                } else {
                    ctx.reply(&format!("Homes: {}", homes.join(", ")));
                }
                Ok(())
            })
            .usage("/home list")
            .help("List your saved homes."),
        )
}

fn home_names(book: &HomeBook, req: &CompletionRequest<'_>) -> Vec<String> {
    let prefix = req.current.unwrap_or("");
    book.list(req.sender.name())
        .into_iter()
        .filter(|name| starts_with_ignore_case(name, prefix))
        .collect()
}

struct SetHome {
    book: Arc<HomeBook>,
    alias: String,
}

impl CommandHandler for SetHome {
    fn initialize(&mut self, ctx: &CommandContext<'_>, depth: usize) -> HandlerResult {
        let alias = ctx.require_arg(depth, "alias")?;
        if alias.chars().count() > MAX_ALIAS_LEN {
            return Err(CommandError::validation("alias too long"));
        }
        self.alias = alias.to_string();
        Ok(())
    }

    fn execute(&mut self, ctx: &CommandContext<'_>) -> HandlerResult {
        self.book.set(ctx.sender().name(), &self.alias);
        Ok(())
    }
}

struct DelHome {
    book: Arc<HomeBook>,
    alias: String,
}

impl CommandHandler for DelHome {
    fn initialize(&mut self, ctx: &CommandContext<'_>, depth: usize) -> HandlerResult {
        self.alias = ctx.require_arg(depth, "alias")?.to_string();
        Ok(())
    }

    fn execute(&mut self, ctx: &CommandContext<'_>) -> HandlerResult {
        if !self.book.remove(ctx.sender().name(), &self.alias) {
            return Err(CommandError::Validation(format!("no home named {}", self.alias)));
        }
        ctx.reply(&format!("Home '{}' deleted.", self.alias));
        Ok(())
    }
}

// ============================================================================
// warp
// ============================================================================

fn warp_spec(warps: Arc<Vec<String>>) -> CommandSpec {
    let known = Arc::clone(&warps);
    CommandSpec::new(["warp"], move || Warp {
        warps: Arc::clone(&warps),
        target: String::new(),
    })
    .usage("/warp <name>")
    .help("Travel to a public warp point.")
    .completer(move |_| known.as_ref().clone())
}

struct Warp {
    warps: Arc<Vec<String>>,
    target: String,
}

impl CommandHandler for Warp {
    fn initialize(&mut self, ctx: &CommandContext<'_>, depth: usize) -> HandlerResult {
        let Some(target) = ctx.arg(depth) else {
            return Err(CommandError::NoSuchCommand);
        };
        self.target = target.to_string();
        Ok(())
    }

    fn execute(&mut self, ctx: &CommandContext<'_>) -> HandlerResult {
        if !self.warps.iter().any(|w| eq_ignore_case(w, &self.target)) {
            return Err(CommandError::Validation(format!("unknown warp: {}", self.target)));
        }
        ctx.reply(&format!("Warping to {}...", self.target));
        Ok(())
    }
}

// ============================================================================
// tp / tpa
// ============================================================================

fn teleport_spec() -> CommandSpec {
    CommandSpec::from_fn(["tp", "teleport"], |ctx, depth| {
        let target = ctx.require_arg(depth, "player")?;
        ctx.reply(&format!("Teleporting to {target}."));
        Ok(())
    })
    .usage("/tp <player>")
    .help("Teleport to another player.")
}

fn teleport_request_spec() -> CommandSpec {
    CommandSpec::from_fn(["tpa"], |ctx, depth| {
        let target = ctx.require_arg(depth, "player")?;
        ctx.reply(&format!("Teleport request sent to {target}."));
        Ok(())
    })
    .usage("/tpa <player>")
    .help("Ask another player for permission to teleport to them.")
}

// ============================================================================
// give
// ============================================================================

fn give_spec() -> CommandSpec {
    CommandSpec::from_fn(["give"], |ctx, depth| {
        let item = ctx.require_arg(depth, "item")?;
        let amount: u32 = ctx.parse_arg(depth + 1, "amount")?;
        if amount == 0 {
            return Err(CommandError::validation("amount must be at least 1"));
        }
        ctx.reply(&format!("Gave {amount} x {item} to {}.", ctx.sender().name()));
        Ok(())
    })
    .usage("/give <item> <amount>")
    .help("Give yourself items.")
}

// ============================================================================
// help / stats / metrics
// ============================================================================

fn installed_registry() -> Result<&'static CommandRegistry, CommandError> {
    CommandRegistry::global()
        .ok_or_else(|| CommandError::Other(anyhow::anyhow!("command registry is not installed")))
}

fn help_spec() -> CommandSpec {
    CommandSpec::from_fn(["help"], |ctx, depth| {
        let registry = installed_registry()?;
        let Some(label) = ctx.arg(depth) else {
            for node in registry.root_nodes() {
                ctx.reply(node.usage_text());
            }
            return Ok(());
        };
        if !registry.help_for(ctx.sender(), label, ctx.args_from(depth + 1)) {
            return Err(CommandError::Validation(format!("Unknown command: {label}")));
        }
        Ok(())
    })
    .usage("/help [command] [subcommand...]")
    .help("Show help for a command.")
    .completer(|req| match CommandRegistry::global() {
        Some(registry) if req.args.len() > 1 => {
            registry.complete_for(req.sender, &req.args[0], &req.args[1..])
        }
        Some(registry) => {
            let prefix = req.current.unwrap_or("");
            registry
                .root_nodes()
                .filter_map(|node| node.names().first())
                .filter(|name| starts_with_ignore_case(name, prefix))
                .cloned()
                .collect()
        }
        None => Vec::new(),
    })
}

fn stats_spec() -> CommandSpec {
    CommandSpec::from_fn(["stats"], |ctx, _| {
        let registry = installed_registry()?;
        let stats = registry.command_stats();
        if stats.is_empty() {
            ctx.reply("No commands used yet.");
        }
        for (command, count) in stats {
            ctx.reply(&format!("{command}: {count}"));
        }
        Ok(())
    })
    .usage("/stats")
    .help("Show how often each command was used.")
}

fn metrics_spec() -> CommandSpec {
    CommandSpec::from_fn(["metrics"], |ctx, _| {
        for line in metrics::gather_metrics().lines().filter(|l| !l.starts_with('#')) {
            ctx.reply(line);
        }
        Ok(())
    })
    .usage("/metrics")
    .help("Dump engine metrics in Prometheus text format.")
}
