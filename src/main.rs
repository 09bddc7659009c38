//! Kolosal mining - command line entry point

use clap::Parser;
use kolosal_mining::cli::{cmd_inspect, cmd_run, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_mining=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { request, config, quiet } => {
            cmd_run(&request, config.as_deref(), quiet)?;
        }
        Commands::Inspect { request } => {
            cmd_inspect(&request)?;
        }
    }

    Ok(())
}
