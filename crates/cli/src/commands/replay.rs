//! Feed a capture through the timing pipeline offline.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::{Context, Result};
use livetiming_core::{
    ColumnVisibility, LeaderboardEngine, PitDeltaOverride, PitLinePredictor, TelemetryStore,
};
use livetiming_service::{DatagramProcessor, LiveSnapshot, ReceiverStats, ServiceConfig};
use parking_lot::RwLock;
use tracing::debug;

use crate::capture::CaptureReader;
use crate::commands::ReplayArgs;
use crate::error::CliError;
use crate::output;

/// Execute the replay command.
pub fn execute(args: &ReplayArgs, mut config: ServiceConfig, json: bool) -> Result<()> {
    if let Some(seconds) = args.pit_delta {
        config.pit_delta_override = PitDeltaOverride::Seconds(seconds);
    }
    if let Some(highlight) = args.highlight {
        config.leaderboard.highlight = highlight.into();
    }
    if let Some(delta_ref) = args.delta_ref {
        config.leaderboard.delta_reference = delta_ref.into();
    }
    config.validate().map_err(CliError::from)?;

    let file = File::open(&args.file)
        .with_context(|| format!("failed to open capture '{}'", args.file.display()))?;
    let reader = CaptureReader::new(BufReader::new(file))?;

    let snapshot = replay(reader, &config)?;
    if json {
        println!("{}", output::snapshot_json_line(&snapshot)?);
    } else {
        let columns = if args.all_columns {
            ColumnVisibility::all()
        } else {
            config.columns
        };
        print!("{}", output::render_table(&snapshot, &columns, !config.performance_mode));
    }
    Ok(())
}

/// Apply every record in order and return the final snapshot.
fn replay<R: std::io::Read>(
    reader: CaptureReader<R>,
    config: &ServiceConfig,
) -> Result<LiveSnapshot, CliError> {
    let store = Arc::new(TelemetryStore::new());
    let predictor = Arc::new(RwLock::new(PitLinePredictor::new(config.pit_delta_override)));
    let stats = Arc::new(ReceiverStats::new());
    let mut processor = DatagramProcessor::new(store.clone(), predictor.clone(), stats.clone());

    for record in reader {
        let record = record?;
        let outcome = processor.process(&record.payload);
        debug!(timestamp_ns = record.timestamp_ns, ?outcome, "replayed datagram");
    }

    let counters = stats.counters();
    let snapshot = LiveSnapshot::build(
        counters.received,
        &store.snapshot(),
        &predictor.read(),
        &LeaderboardEngine::new(),
        &config.leaderboard,
        counters,
    );
    Ok(snapshot)
}
