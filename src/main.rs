mod cli;
mod commands;
mod paths;
mod resource;
mod schema;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    /// Explicit config file, if one was given
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    match cli.command {
        Command::Status(args) => commands::declarative::status(&ctx, args),
        Command::Apply(args) => commands::declarative::apply(&ctx, args),
        Command::Set {
            domain,
            key,
            value,
            r#type,
        } => commands::defaults::set(&ctx, &domain, &key, &value, r#type.as_deref()),
        Command::Read { domain, key } => commands::defaults::read(&ctx, &domain, &key),
        Command::Types => commands::defaults::types(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prefsync", &mut io::stdout());
            Ok(())
        }
    }
}
