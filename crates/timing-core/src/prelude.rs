//! Prelude for livetiming-core.
//!
//! Re-exports the types most callers need.

pub use crate::engine::LeaderboardEngine;
pub use crate::entry::{DriverStatus, LeaderboardDriverEntry};
pub use crate::error::{OptionsError, StoreError, StoreResult};
pub use crate::history::PositionHistoryBuffer;
pub use crate::options::{
    ColumnVisibility, DeltaReference, HighlightMode, LeaderboardOptions, UpdateFrequency,
};
pub use crate::pit_line::{PitDeltaOverride, PitLinePredictor};
pub use crate::store::{StoreSnapshot, TelemetryStore};
