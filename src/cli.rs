use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prefsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative macOS defaults: converge preferences to a config file", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: <config dir>/config.toml)
    #[arg(short, long, global = true, env = "PREFSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show configured defaults that differ from the system
    Status(StatusArgs),

    /// Write every configured default that differs
    Apply(ApplyArgs),

    /// Set a single default
    Set {
        /// Domain (e.g., com.apple.finder)
        domain: String,

        /// Key (e.g., ShowPathbar)
        key: String,

        /// Value to set
        value: String,

        /// Type tag (boolean, string, integer, float); inferred when omitted
        #[arg(short, long)]
        r#type: Option<String>,
    },

    /// Show the current type and value of a default
    Read {
        /// Domain (e.g., com.apple.finder)
        domain: String,

        /// Key (e.g., ShowPathbar)
        key: String,
    },

    /// List registered value types in inference order
    Types,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct StatusArgs {
    /// Only entries whose domain.key contains this text
    pub target: Option<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only entries whose domain.key contains this text
    pub target: Option<String>,

    /// Show what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Parallel writes (default: from config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
