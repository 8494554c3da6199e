//! Decode failures.
//!
//! Every variant is recoverable: the caller drops the datagram and waits for
//! the next one.

use thiserror::Error;

/// Errors produced while decoding a single datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The datagram length does not match the fixed layout for its header
    /// (too short for the header, or payload size differs from the layout
    /// declared for the packet id and format).
    #[error("packet length mismatch: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Byte count required by the layout.
        expected: usize,
        /// Byte count actually received.
        actual: usize,
    },

    /// The header carries a packet id outside the enumerated kinds.
    #[error("unknown packet id {0}")]
    UnknownPacketId(u8),

    /// The header carries a packet format with no known layout.
    #[error("unsupported packet format {0}")]
    UnsupportedVersion(u16),
}

/// Result alias for decoder operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
