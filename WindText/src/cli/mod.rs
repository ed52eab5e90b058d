//! WindText CLI - Command-line interface for the message bank tools

pub mod commands;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use tracing::Level;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "windtext")]
#[command(about = "WindText: Wind Waker message bank tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./windtext.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Run the WindText CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    cli.command.execute(&config)?;

    Ok(())
}
