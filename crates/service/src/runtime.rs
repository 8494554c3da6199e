//! Live timing service lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use livetiming_core::{
    LeaderboardOptions, OptionsError, PitDeltaOverride, PitLinePredictor, TelemetryStore,
};
use parking_lot::RwLock;
use tokio::net::UdpSocket;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::receiver::{DatagramProcessor, ReceiverCounters, ReceiverStats, run_receiver};
use crate::snapshot::LiveSnapshot;
use crate::ticker::{TickContext, run_ticker};

/// A running receive task plus tick task.
///
/// Dropping the handle without [`LiveTiming::stop`] leaves both tasks running
/// until the runtime shuts down.
#[derive(Debug)]
pub struct LiveTiming {
    config: ServiceConfig,
    local_addr: SocketAddr,
    store: Arc<TelemetryStore>,
    predictor: Arc<RwLock<PitLinePredictor>>,
    options: Arc<RwLock<LeaderboardOptions>>,
    stats: Arc<ReceiverStats>,
    shutdown_tx: broadcast::Sender<()>,
    snapshots: watch::Receiver<Arc<LiveSnapshot>>,
    tasks: Vec<JoinHandle<()>>,
}

impl LiveTiming {
    /// Validate `config`, bind the socket and spawn both tasks.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`ServiceConfig::validate`], or
    /// [`ServiceError::Bind`] when the socket cannot be bound.
    pub async fn start(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        let addr = config.socket_addr();
        let socket = match UdpSocket::bind(addr).await {
            Ok(socket) => socket,
            Err(err) => {
                warn!(error = %err, %addr, "live timing UDP bind failed");
                return Err(ServiceError::bind(addr, err));
            }
        };
        let local_addr = socket.local_addr()?;
        info!(
            %local_addr,
            hz = config.update_frequency.hz(),
            "live timing listening"
        );

        let store = Arc::new(TelemetryStore::new());
        let predictor = Arc::new(RwLock::new(PitLinePredictor::new(config.pit_delta_override)));
        let options = Arc::new(RwLock::new(config.leaderboard));
        let stats = Arc::new(ReceiverStats::new());
        let (shutdown_tx, _) = broadcast::channel(1);
        let (snapshot_tx, snapshots) = watch::channel(Arc::new(LiveSnapshot::default()));

        let processor = DatagramProcessor::new(store.clone(), predictor.clone(), stats.clone());
        let receiver = tokio::spawn(run_receiver(
            socket,
            processor,
            config.recv_buffer_bytes,
            shutdown_tx.subscribe(),
        ));
        let ticker = tokio::spawn(run_ticker(
            TickContext {
                store: store.clone(),
                predictor: predictor.clone(),
                options: options.clone(),
                stats: stats.clone(),
                snapshots: snapshot_tx,
            },
            config.update_frequency,
            shutdown_tx.subscribe(),
        ));

        Ok(Self {
            config,
            local_addr,
            store,
            predictor,
            options,
            stats,
            shutdown_tx,
            snapshots,
            tasks: vec![receiver, ticker],
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &Arc<TelemetryStore> {
        &self.store
    }

    /// Receiver for published snapshots; the first value is an empty
    /// snapshot with tick 0.
    pub fn subscribe(&self) -> watch::Receiver<Arc<LiveSnapshot>> {
        self.snapshots.clone()
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> Arc<LiveSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn counters(&self) -> ReceiverCounters {
        self.stats.counters()
    }

    /// Change the pit delta for the rest of the session.
    ///
    /// # Errors
    ///
    /// [`OptionsError::InvalidPitDelta`]; the previous override stays.
    pub fn set_pit_delta_override(&self, delta: PitDeltaOverride) -> Result<(), OptionsError> {
        self.predictor.write().set_delta_override(delta)?;
        info!(?delta, "pit delta override changed");
        Ok(())
    }

    /// Takes effect from the next tick.
    pub fn set_leaderboard_options(&self, options: LeaderboardOptions) {
        *self.options.write() = options;
    }

    /// Signal both tasks and wait for them to finish.
    pub async fn stop(self) {
        if self.shutdown_tx.send(()).is_err() {
            warn!("live timing tasks already gone");
        }
        for task in self.tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "live timing task ended abnormally");
            }
        }
        info!(local_addr = %self.local_addr, "live timing stopped");
    }
}
