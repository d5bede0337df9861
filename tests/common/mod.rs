//! Integration test common infrastructure.
//!
//! Builds registries the way a host would and records what handlers saw.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use plugcmd::command::{CommandSpec, RegistryBuilder};
use plugcmd::console::commands::{self, HomeBook};
use plugcmd::CommandRegistry;

pub const WARPS: &[&str] = &["spawn", "market", "arena"];

/// Owned argument tokens.
pub fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

/// The sample plugin, sealed but not installed.
pub fn sample_registry() -> (CommandRegistry, Arc<HomeBook>) {
    let homes = Arc::new(HomeBook::default());
    let mut builder = RegistryBuilder::new();
    commands::register_all(
        &mut builder,
        Arc::clone(&homes),
        WARPS.iter().map(|w| w.to_string()).collect(),
    )
    .expect("sample plugin registers");
    (builder.seal(), homes)
}

/// Every terminal run as `(node, depth)`, in order.
#[derive(Clone, Default)]
pub struct RunLog(Arc<Mutex<Vec<(String, usize)>>>);

impl RunLog {
    pub fn entries(&self) -> Vec<(String, usize)> {
        self.0.lock().clone()
    }

    /// A leaf that records its runs under `tag`.
    pub fn leaf(&self, names: &[&str], tag: &'static str) -> CommandSpec {
        let log = Arc::clone(&self.0);
        CommandSpec::from_fn(names.to_vec(), move |_, depth| {
            log.lock().push((tag.to_string(), depth));
            Ok(())
        })
        .usage(format!("/{tag}"))
    }
}
