//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Channelflow - channel analytics ingestion into a DuckDB warehouse
#[derive(Parser, Debug)]
#[command(name = "cf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the channel statistics snapshot and the latest uploads
    Daily(JobArgs),

    /// Reload channel, video and playlist tables and take weekly snapshots
    Weekly(JobArgs),

    /// Serve the jobs over HTTP for an external scheduler
    #[cfg(feature = "serve")]
    Serve(ServeArgs),
}

/// Arguments for the daily and weekly commands
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Print the job report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the serve command
#[cfg(feature = "serve")]
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub addr: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
