//! livetiming - F1 2021 live timing in the terminal
//!
//! Listens for the game's UDP telemetry and renders a live leaderboard with
//! gaps, intervals, deltas, sectors, tyres and the predicted pit line.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod capture;
mod commands;
mod completion;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CaptureArgs, ConfigCommands, DecodeArgs, LiveArgs, ReplayArgs};

#[derive(Parser)]
#[command(name = "livetiming")]
#[command(about = "Live timing for F1 2021 UDP telemetry")]
#[command(version)]
#[command(long_about = "
livetiming listens for the UDP telemetry broadcast by F1 2021 and turns it into
a live leaderboard: race order, gap to leader, interval, best/last deltas,
sectors, tyres, pit state and a predicted pit-entry line for your car.

Configuration is read from a JSON file (--config). LIVETIMING_UDP_PORT and
LIVETIMING_UPDATE_HZ override the file; command-line flags override both.
Use --json for one JSON document per line.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Performance mode: no colours in the leaderboard
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(short, long, global = true, env = "LIVETIMING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for telemetry and show the live leaderboard
    Live(LiveArgs),

    /// Record raw datagrams to a capture file
    Capture(CaptureArgs),

    /// Run a capture through the leaderboard and print the final state
    Replay(ReplayArgs),

    /// List the packets in a capture file
    Decode(DecodeArgs),

    /// Configuration file commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "livetiming={log_level},livetiming_service={log_level},livetiming_core={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = execute_command(&cli).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(error::exit_code(&e));
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }
    let mut config = commands::load_config(cli.config.as_deref())?;
    if cli.no_color {
        config.performance_mode = true;
    }
    if config.performance_mode {
        colored::control::set_override(false);
    }
    match &cli.command {
        Commands::Live(args) => commands::live::execute(args, config, cli.json).await,
        Commands::Capture(args) => commands::capture::execute(args, config, cli.json).await,
        Commands::Replay(args) => commands::replay::execute(args, config, cli.json),
        Commands::Decode(args) => commands::decode::execute(args, cli.json),
        Commands::Config(cmd) => commands::config::execute(cmd, &config, cli.json),
        Commands::Completion { .. } => Ok(()),
    }
}
