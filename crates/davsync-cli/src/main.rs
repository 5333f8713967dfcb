mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SyncOptions;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A run interrupted mid-phase leaves the remote partially updated
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    davsync_core::logging::init(cli.verbose).context("Failed to initialize logging")?;
    tracing::debug!(command = ?cli.command, "starting");

    let options = SyncOptions::new(
        cli.verbose,
        cli.config.as_deref(),
        cli.no_config,
        cli.overrides(),
    );

    match &cli.command {
        Commands::Deploy => {
            commands::Deploy::execute(&options)
                .await
                .context("Failed to execute deploy command")?;
        }
        Commands::Status => {
            commands::Status::execute(&options)
                .await
                .context("Failed to execute status command")?;
        }
        Commands::Config => {
            commands::Config::execute(&options).context("Failed to execute config command")?;
        }
    }

    Ok(())
}
