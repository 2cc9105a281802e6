// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! courier - event delivery simulator

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::send;
use courier_core::RuntimeConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Courier - cross-device event delivery"
)]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch an event across a simulated network
    Send(send::SendArgs),
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Send(args) => send::send(args, config).await?,
        Commands::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => Ok(RuntimeConfig::load(path)?),
        None => Ok(RuntimeConfig::default()),
    }
}

/// Log to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
