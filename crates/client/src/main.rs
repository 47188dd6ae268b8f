//! Sect client binary.
//!
//! Command-line front-end over the sect runtime. Each invocation opens the
//! store, runs one controller operation, prints its `{success, message, data}`
//! envelope as JSON and closes the store again.
//!
//! # Examples
//!
//! ```bash
//! sect roll 3
//! sect create --name 韩立 --age 16 --teacher 1
//! sect simulate --years 10 --ticks 5 --seed 42
//! ```
mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use client_bootstrap::{AppBuilder, AppConfig};
use commands::Command;

/// Sect cultivation data manager
#[derive(Parser)]
#[command(name = "sect")]
#[command(about = "Manage the players of a cultivation sect", long_about = None)]
#[command(version)]
struct Cli {
    /// Store file (overrides SECT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep the store in memory for this invocation
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    /// Seed for breakthrough rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<ExitCode> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    logging::setup_logging(&config)?;

    let mut builder = AppBuilder::new(config).seed(cli.seed);
    if cli.memory {
        builder = builder.in_memory();
    } else if let Some(path) = cli.db {
        builder = builder.db_path(path);
    }
    let setup = builder.build()?;

    let response = cli.command.execute(&setup);
    setup.shutdown()?;
    let response = response?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
