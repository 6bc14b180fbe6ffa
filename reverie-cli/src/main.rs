//! Reverie command line interface.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use reverie_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reverie")]
#[command(about = "An ambient audio/visual session engine")]
struct Cli {
    /// Console log level
    #[arg(long, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    /// Directory for debug log files (default: ./logs)
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::handle_command(cli.command).await
}
