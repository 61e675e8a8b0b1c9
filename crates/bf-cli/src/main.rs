//! Brickflow CLI - extract, transform, and load Rebrickable data

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{check_staging, clean, extract_api, extract_sql, load, run, transform};

/// Route `log` records through a fmt subscriber; `RUST_LOG` wins over `-v`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignore an already-installed subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::CheckStaging(args) => check_staging::execute(args, &cli.global).await,
        cli::Commands::ExtractSql => extract_sql::execute(&cli.global).await,
        cli::Commands::ExtractApi => extract_api::execute(&cli.global).await,
        cli::Commands::Transform => transform::execute(&cli.global).await,
        cli::Commands::Load => load::execute(&cli.global).await,
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Clean(args) => clean::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::ExitCode::FAILURE
            }
        },
    }
}
