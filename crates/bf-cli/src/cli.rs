//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Brickflow - extract Rebrickable data, model it, and load it into a warehouse
#[derive(Parser, Debug)]
#[command(name = "bf")]
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

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the staging root
    #[arg(long, global = true, env = "BRICKFLOW_STAGING_ROOT")]
    pub staging_root: Option<PathBuf>,

    /// Override the transformed root
    #[arg(long, global = true, env = "BRICKFLOW_TRANSFORMED_ROOT")]
    pub transformed_root: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether every staging artifact is present
    CheckStaging(CheckStagingArgs),

    /// Dump categorized source tables into the staging area
    ExtractSql,

    /// Fetch every minifig page from the API into the staging area
    ExtractApi,

    /// Build the dimensional model from the staging area
    Transform,

    /// Replace warehouse tables with the transformed artifacts
    Load,

    /// Run the whole pipeline
    Run(RunArgs),

    /// Remove the staging and transformed directories
    Clean(CleanArgs),
}

/// Arguments for the check-staging command
#[derive(Args, Debug)]
pub struct CheckStagingArgs {
    /// List every missing artifact instead of the first
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Extract even when every staging artifact is present
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
