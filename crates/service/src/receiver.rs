//! Receive path: datagram -> decode -> store -> position history.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use livetiming_core::{PitLinePredictor, StoreError, TelemetryStore};
use livetiming_telemetry_f1::{DecodeError, PacketId, decode};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Datagram counters, updated by the receive task.
#[derive(Debug, Default)]
pub struct ReceiverStats {
    received: AtomicU64,
    applied: AtomicU64,
    decode_errors: AtomicU64,
    stale_frames: AtomicU64,
    session_mismatches: AtomicU64,
}

impl ReceiverStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> ReceiverCounters {
        ReceiverCounters {
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            stale_frames: self.stale_frames.load(Ordering::Relaxed),
            session_mismatches: self.session_mismatches.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`ReceiverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceiverCounters {
    pub received: u64,
    pub applied: u64,
    pub decode_errors: u64,
    pub stale_frames: u64,
    pub session_mismatches: u64,
}

impl ReceiverCounters {
    /// Datagrams that were received but left no trace in the store.
    pub fn dropped(&self) -> u64 {
        self.decode_errors
            .saturating_add(self.stale_frames)
            .saturating_add(self.session_mismatches)
    }
}

/// What happened to one datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum DatagramOutcome {
    Applied(PacketId),
    DecodeFailed(DecodeError),
    Rejected(StoreError),
}

/// Applies datagrams to the store and feeds the tracked car's position into
/// the pit-line predictor. Synchronous; the receive task drives it.
#[derive(Debug)]
pub struct DatagramProcessor {
    store: Arc<TelemetryStore>,
    predictor: Arc<RwLock<PitLinePredictor>>,
    stats: Arc<ReceiverStats>,
    /// (session UID, car index) the position history currently belongs to.
    tracking: Option<(u64, u8)>,
}

impl DatagramProcessor {
    pub fn new(
        store: Arc<TelemetryStore>,
        predictor: Arc<RwLock<PitLinePredictor>>,
        stats: Arc<ReceiverStats>,
    ) -> Self {
        Self {
            store,
            predictor,
            stats,
            tracking: None,
        }
    }

    pub fn stats(&self) -> &Arc<ReceiverStats> {
        &self.stats
    }

    /// Decode and apply one datagram. Failures leave the store untouched.
    pub fn process(&mut self, datagram: &[u8]) -> DatagramOutcome {
        ReceiverStats::bump(&self.stats.received);
        let packet = match decode(datagram) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(error = %err, len = datagram.len(), "discarding datagram");
                ReceiverStats::bump(&self.stats.decode_errors);
                return DatagramOutcome::DecodeFailed(err);
            }
        };
        let kind = packet.id();
        if let Err(err) = self.store.update(packet) {
            match err {
                StoreError::StaleFrame { .. } => ReceiverStats::bump(&self.stats.stale_frames),
                StoreError::SessionMismatch { .. } => {
                    ReceiverStats::bump(&self.stats.session_mismatches);
                }
            }
            return DatagramOutcome::Rejected(err);
        }
        ReceiverStats::bump(&self.stats.applied);
        if kind == PacketId::LapData {
            self.record_tracked_position();
        }
        DatagramOutcome::Applied(kind)
    }

    fn record_tracked_position(&mut self) {
        let snapshot = self.store.snapshot();
        let (Some(session_uid), Some(car_index), Some(lap)) = (
            snapshot.session_uid(),
            snapshot.tracked_car_index(),
            snapshot.tracked_lap(),
        ) else {
            return;
        };

        let mut predictor = self.predictor.write();
        if self.tracking != Some((session_uid, car_index)) {
            if let Some((_, previous)) = self.tracking {
                info!(previous, car_index, "tracked car changed, position history cleared");
            }
            predictor.clear_history();
            self.tracking = Some((session_uid, car_index));
        }

        let track_length_m = snapshot.session().map_or(0, |s| s.session.track_length_m);
        if track_length_m == 0 {
            return;
        }
        predictor.record(
            lap.current_lap_time_ms,
            lap.corrected_lap_distance(track_length_m),
        );
    }
}

/// Receive loop. Runs until `shutdown` fires; socket errors are logged and
/// the loop keeps going.
pub(crate) async fn run_receiver(
    socket: UdpSocket,
    mut processor: DatagramProcessor,
    recv_buffer_bytes: usize,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut buf = vec![0u8; recv_buffer_bytes];
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                debug!("receiver stopping");
                break;
            }
            result = socket.recv(&mut buf) => match result {
                Ok(len) => {
                    let datagram = buf.get(..len).unwrap_or_default();
                    processor.process(datagram);
                }
                Err(err) => {
                    warn!(error = %err, "UDP receive failed");
                }
            }
        }
    }
}
