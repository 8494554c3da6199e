//! # livetiming-core
//!
//! Turns decoded F1 2021 telemetry into a live leaderboard.
//!
//! ## Architecture
//!
//! - [`store`] - latest packet of each kind, published as immutable snapshots
//! - [`engine`] - ordered leaderboard rows with gaps, intervals and deltas
//! - [`history`] - elapsed-lap-time to track-position samples
//! - [`pit_line`] - per-track pit deltas and the pit-entry line prediction
//! - [`track_map`] - circular track map geometry
//! - [`options`] - highlight, delta reference, refresh rate, column flags
//! - [`error`] - store and option errors
//!
//! ## Threading
//!
//! [`TelemetryStore`] is shared behind an `Arc`: one writer applies packets,
//! any number of readers take snapshots. [`PitLinePredictor`] is not
//! synchronised itself; share it behind a lock when the writer and the
//! reader run on different tasks.
//!
//! ## Example
//!
//! ```rust
//! use livetiming_core::prelude::*;
//!
//! let store = TelemetryStore::new();
//! let engine = LeaderboardEngine::new();
//! // nothing received yet: no session, no rows
//! let rows = engine.compute(&store.snapshot(), &LeaderboardOptions::default());
//! assert!(rows.is_empty());
//!
//! let predictor = PitLinePredictor::default();
//! assert_eq!(predictor.predict_pit_line_meters(90_000, 5_000, None), None);
//! ```

#![deny(static_mut_refs)]

pub mod engine;
pub mod entry;
pub mod error;
pub mod history;
pub mod options;
pub mod pit_line;
pub mod store;
pub mod track_map;

pub mod prelude;

pub use engine::LeaderboardEngine;
pub use entry::{DriverStatus, LeaderboardDriverEntry};
pub use error::{OptionsError, StoreError, StoreResult};
pub use history::{BUCKET_MS, HISTORY_SLOTS, PositionHistoryBuffer};
pub use options::{
    ColumnVisibility, DeltaReference, HighlightMode, LeaderboardOptions, UpdateFrequency,
};
pub use pit_line::{
    PitDelta, PitDeltaOverride, PitDeltaSource, PitLinePredictor, track_pit_delta,
};
pub use store::{StoreSnapshot, TelemetryStore};
pub use track_map::{PitLinePoint, TrackMapPoint, angle_from_position, track_map_points};
