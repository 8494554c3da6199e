//! Error types for the timing core.
//!
//! None of these are fatal: a rejected packet leaves the store untouched and
//! an invalid option is refused before it reaches the engine.

use livetiming_telemetry_f1::PacketId;
use thiserror::Error;

/// Reasons the store refuses a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The frame identifier is lower than the last one accepted for the same
    /// session and packet kind.
    #[error("stale {kind} frame {frame} (last accepted {last_accepted})")]
    StaleFrame {
        /// Packet kind.
        kind: PacketId,
        /// Frame identifier of the rejected packet.
        frame: u32,
        /// Highest frame identifier accepted so far for this kind.
        last_accepted: u32,
    },

    /// The packet belongs to a session the store has already left.
    #[error("packet from retired session {received:#018x} (current {current:#018x})")]
    SessionMismatch {
        /// Session UID currently held by the store.
        current: u64,
        /// Session UID carried by the rejected packet.
        received: u64,
    },
}

impl StoreError {
    #[must_use]
    pub fn stale_frame(kind: PacketId, frame: u32, last_accepted: u32) -> Self {
        Self::StaleFrame {
            kind,
            frame,
            last_accepted,
        }
    }

    #[must_use]
    pub fn session_mismatch(current: u64, received: u64) -> Self {
        Self::SessionMismatch { current, received }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Invalid user-facing option values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OptionsError {
    /// A manual pit delta must be a finite number of seconds above zero.
    #[error("pit delta override must be finite and greater than 0, got {0}")]
    InvalidPitDelta(f32),

    /// Update frequency outside the supported set.
    #[error("unsupported update frequency {0} Hz (expected 1, 10, 30 or 60)")]
    InvalidUpdateFrequency(u32),
}
