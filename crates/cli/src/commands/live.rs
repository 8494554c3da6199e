//! Live leaderboard from the game's UDP stream.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::*;
use livetiming_core::ColumnVisibility;
use livetiming_service::{LiveSnapshot, LiveTiming, ServiceConfig};
use tokio::time::Instant;
use tracing::info;

use crate::commands::LiveArgs;
use crate::error::CliError;
use crate::output;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Execute the live command.
pub async fn execute(args: &LiveArgs, config: ServiceConfig, json: bool) -> Result<()> {
    let config = args.apply(config);
    config.validate().map_err(CliError::from)?;
    let columns = if args.all_columns {
        ColumnVisibility::all()
    } else {
        config.columns
    };
    let colour = !config.performance_mode;

    let service = LiveTiming::start(config).await.map_err(CliError::from)?;
    if !json {
        eprintln!("{} {}", "Listening on".green(), service.local_addr());
    }

    let mut snapshots = service.subscribe();
    let deadline = args.duration.map(|s| Instant::now() + Duration::from_secs(s));
    let until_deadline = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(until_deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut until_deadline => break Ok(()),
            _ = &mut ctrl_c => {
                info!("interrupted");
                break Ok(());
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Err(err) = print_snapshot(&snapshot, &columns, colour, json) {
                    break Err(err);
                }
            }
        }
    };

    service.stop().await;
    result
}

fn print_snapshot(
    snapshot: &LiveSnapshot,
    columns: &ColumnVisibility,
    colour: bool,
    json: bool,
) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", output::snapshot_json_line(snapshot)?)?;
    } else {
        write!(stdout, "{CLEAR_SCREEN}{}", output::render_table(snapshot, columns, colour))?;
    }
    stdout.flush()?;
    Ok(())
}
