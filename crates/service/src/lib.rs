//! # livetiming-service
//!
//! Runs live timing against a UDP telemetry stream.
//!
//! Two tokio tasks share one [`livetiming_core::TelemetryStore`]:
//!
//! - the receive task decodes each datagram, applies it to the store and
//!   records the tracked car's position for the pit-line prediction;
//! - the tick task rebuilds a [`LiveSnapshot`] at the configured rate and
//!   publishes it through a `watch` channel.
//!
//! A broadcast stop signal ends both tasks. Nothing that arrives on the
//! socket can stop the service: bad datagrams are logged, counted and
//! dropped.
//!
//! ```no_run
//! use livetiming_service::{LiveTiming, ServiceConfig};
//!
//! # async fn run() -> Result<(), livetiming_service::ServiceError> {
//! let service = LiveTiming::start(ServiceConfig::default().with_env_overrides()).await?;
//! let mut snapshots = service.subscribe();
//! while snapshots.changed().await.is_ok() {
//!     let snapshot = snapshots.borrow_and_update().clone();
//!     println!("tick {} rows {}", snapshot.tick, snapshot.entries.len());
//! }
//! service.stop().await;
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]

pub mod config;
pub mod error;
pub mod receiver;
pub mod runtime;
pub mod snapshot;
mod ticker;

pub use config::{DEFAULT_UDP_PORT, ENV_UDP_PORT, ENV_UPDATE_HZ, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use receiver::{DatagramOutcome, DatagramProcessor, ReceiverCounters, ReceiverStats};
pub use runtime::LiveTiming;
pub use snapshot::LiveSnapshot;
