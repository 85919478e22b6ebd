pub mod declarative;
pub mod defaults;

use crate::Context;
use crate::schema::PrefsyncConfig;
use anyhow::Result;
use colored::Colorize;
use prefkit::{DefaultsCli, Reconciler, registry};
use std::process::Command;
use std::sync::Arc;

/// Loaded config plus a reconciler wired to the `defaults` program it names
pub struct Session {
    pub config: PrefsyncConfig,
    pub reconciler: Reconciler,
}

impl Session {
    /// Load the config and install its codec registry for this process
    pub fn open(ctx: &Context) -> Result<Self> {
        let config = PrefsyncConfig::load(ctx.config.as_deref())?;
        let registry = registry::install(config.registry())?;
        let backend = DefaultsCli::with_program(config.settings.defaults_command.clone());
        log::debug!(
            "Using `{}` with types: {}",
            backend.program(),
            registry.tags().collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            reconciler: Reconciler::new(registry, Arc::new(backend)),
            config,
        })
    }
}

/// Restart a macOS service so it picks up new defaults
pub fn restart_service(service: &str) -> Result<()> {
    let status = Command::new("killall").arg(service).status()?;

    if status.success() {
        println!("    {} Restarted {}", "✓".green(), service);
    } else {
        log::warn!("killall {service} exited with {status}");
        println!(
            "    {} Could not restart {} (may not be running)",
            "⚠".yellow(),
            service
        );
    }

    Ok(())
}
