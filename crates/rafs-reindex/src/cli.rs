//! CLI definition using clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rafs-reindex")]
#[command(author, version, about = "Trigger the RAFS DDMS reindex endpoint", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// YAML config file (falls back to REINDEX_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Flags for the default `run` command
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reindex job once
    Run(RunArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Skip TLS certificate verification for the target request
    #[arg(long)]
    pub insecure: bool,

    /// Attempts at the target request, including the first
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Pre-issued secret store token; skips the ambient credential chain
    #[arg(long, env = "REINDEX_STORE_TOKEN", hide_env_values = true)]
    pub store_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,

    /// Check the effective configuration without running the job
    Validate,
}
