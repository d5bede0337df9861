//! plugcmd - console host for the command engine.
//!
//! Reads commands from stdin, one per line, and prints replies to stdout.
//! Prefix a line with `?` to ask for completions instead of running it.

use std::sync::Arc;

use plugcmd::command::RegistryBuilder;
use plugcmd::config::{self, Config};
use plugcmd::console::{self, commands::HomeBook};
use plugcmd::metrics;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_WARPS: &[&str] = &["spawn", "market", "arena", "nether_hub"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; with no path every section uses its defaults
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .map_err(|e| anyhow::anyhow!("failed to load config {path}: {e}"))?,
        None => Config::default(),
    };

    // Initialize tracing (stderr, so replies on stdout stay clean)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "refusing to start with {} configuration error(s)",
            errors.len()
        ));
    }

    metrics::init();

    let mut builder = RegistryBuilder::with_config(&config.commands);
    console::commands::register_all(
        &mut builder,
        Arc::new(HomeBook::default()),
        DEFAULT_WARPS.iter().map(|w| w.to_string()).collect(),
    )?;
    let registry = builder.seal().install()?;

    info!(sender = %config.console.sender_name, "Console ready");

    console::run(registry, &config.console, tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}
