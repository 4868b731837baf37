//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::records::RecordsCommand;
use crate::commands::scope::ScopeCommand;

/// Browse and edit records on a record API.
#[derive(Parser, Debug)]
#[command(name = "recsync")]
#[command(author, version = env!("RECSYNC_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Record API base URL (overrides the stored profile)
    #[arg(long, env = "RECSYNC_API", global = true)]
    pub api: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "RECSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose whose records you see and edit
    Scope(ScopeCommand),

    /// Record operations
    Records(RecordsCommand),
}
