//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// template-sync - keep a collection's note types in step with a template repository
#[derive(Parser, Debug)]
#[command(name = "template-sync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Collection database path (default: ~/.template-sync/data/collection.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Actor name for the audit trail
    #[arg(long, global = true, env = "TEMPLATE_SYNC_ACTOR")]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Compare against the collection without writing to it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the template repository and sync every note type it defines
    Sync {
        /// Repository URL (default: the published template repository)
        #[arg(long)]
        repo: Option<String>,

        /// Scratch directory the repository is cloned into
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Sync note types from an already checked-out template tree
    Import {
        /// Directory holding one folder per note type
        dir: PathBuf,
    },

    /// List note types stored in the collection
    List,

    /// Show one stored note type as JSON
    Show {
        /// Exact note type name
        name: String,

        /// Include the audit history
        #[arg(long)]
        history: bool,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
