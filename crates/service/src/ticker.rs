//! Refresh path: rebuild and publish a [`LiveSnapshot`] on a fixed interval.

use std::sync::Arc;

use livetiming_core::{
    LeaderboardEngine, LeaderboardOptions, PitLinePredictor, TelemetryStore, UpdateFrequency,
};
use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use crate::receiver::ReceiverStats;
use crate::snapshot::LiveSnapshot;

/// Everything the tick task reads or publishes to.
pub(crate) struct TickContext {
    pub store: Arc<TelemetryStore>,
    pub predictor: Arc<RwLock<PitLinePredictor>>,
    pub options: Arc<RwLock<LeaderboardOptions>>,
    pub stats: Arc<ReceiverStats>,
    pub snapshots: watch::Sender<Arc<LiveSnapshot>>,
}

impl TickContext {
    fn publish(&self, tick: u64, engine: &LeaderboardEngine) {
        let store = self.store.snapshot();
        let options = *self.options.read();
        let snapshot = {
            let predictor = self.predictor.read();
            LiveSnapshot::build(
                tick,
                &store,
                &predictor,
                engine,
                &options,
                self.stats.counters(),
            )
        };
        trace!(tick, rows = snapshot.entries.len(), "snapshot published");
        self.snapshots.send_replace(Arc::new(snapshot));
    }
}

/// Tick loop. The handler runs inline, so a slow tick delays the next one
/// instead of overlapping it; missed ticks are skipped.
pub(crate) async fn run_ticker(
    ctx: TickContext,
    frequency: UpdateFrequency,
    mut shutdown: broadcast::Receiver<()>,
) {
    let engine = LeaderboardEngine::new();
    let mut interval = time::interval(frequency.period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                debug!(tick, "ticker stopping");
                break;
            }
            _ = interval.tick() => {
                tick = tick.saturating_add(1);
                ctx.publish(tick, &engine);
            }
        }
    }
}
