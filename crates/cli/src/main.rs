//! Earn allocator CLI - preview and execute allocation runs.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_allocator, run_preview};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview(args) => {
            run_preview(&args, cli.format).await?;
        }
        Commands::Run(args) => {
            run_allocator(&args, cli.format).await?;
        }
    }

    Ok(())
}
