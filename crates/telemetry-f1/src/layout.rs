//! Fixed payload layouts keyed by (packet id, packet format).
//!
//! | Packet ID | Name                | Records       | Total bytes |
//! |-----------|---------------------|---------------|-------------|
//! | 0         | Motion              | 22 x 60 + 120 | 1464        |
//! | 1         | Session             | 1 x 601       | 625         |
//! | 2         | Lap Data            | 22 x 43       | 970         |
//! | 3         | Event               | 1 x 12        | 36          |
//! | 4         | Participants        | 1 + 22 x 56   | 1257        |
//! | 5         | Car Setups          | 22 x 49       | 1102        |
//! | 6         | Car Telemetry       | 22 x 60 + 3   | 1347        |
//! | 7         | Car Status          | 22 x 47       | 1058        |
//! | 8         | Final Classification| 1 + 22 x 37   | 839         |
//! | 9         | Lobby Info          | 1 + 22 x 53   | 1191        |
//! | 10        | Car Damage          | 22 x 39       | 882         |
//! | 11        | Session History     | 1 x 1131      | 1155        |

use crate::error::{DecodeError, DecodeResult};
use crate::header::{HEADER_SIZE, NUM_CARS, PACKET_FORMAT_2021, PacketId};

/// One LapData entry.
pub const LAP_DATA_ENTRY_SIZE: usize = 43;
/// One ParticipantData entry.
pub const PARTICIPANT_ENTRY_SIZE: usize = 56;
/// One CarStatusData entry.
pub const CAR_STATUS_ENTRY_SIZE: usize = 47;
/// Session payload (single record).
pub const SESSION_PAYLOAD_SIZE: usize = 601;
/// Session history payload (single record for one car).
pub const SESSION_HISTORY_PAYLOAD_SIZE: usize = 1131;
/// One LapHistoryData entry inside a session history payload.
pub const LAP_HISTORY_ENTRY_SIZE: usize = 11;
/// Lap history slots carried by a session history packet.
pub const MAX_LAP_HISTORY: usize = 100;
/// Tyre stint slots carried by a session history packet.
pub const MAX_TYRE_STINTS: usize = 8;
/// Marshal zone slots in the session payload.
pub const MAX_MARSHAL_ZONES: usize = 21;
/// Largest format 2021 datagram (Motion).
pub const MAX_PACKET_SIZE: usize = 1464;

/// Shape of a payload: `prefix` bytes, then `count` records of `record_size`,
/// then `suffix` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketLayout {
    pub prefix: usize,
    pub record_size: usize,
    pub count: usize,
    pub suffix: usize,
}

impl PacketLayout {
    const fn per_car(record_size: usize) -> Self {
        Self {
            prefix: 0,
            record_size,
            count: NUM_CARS,
            suffix: 0,
        }
    }

    const fn single(record_size: usize) -> Self {
        Self {
            prefix: 0,
            record_size,
            count: 1,
            suffix: 0,
        }
    }

    const fn with_prefix(mut self, prefix: usize) -> Self {
        self.prefix = prefix;
        self
    }

    const fn with_suffix(mut self, suffix: usize) -> Self {
        self.suffix = suffix;
        self
    }

    /// Payload size excluding the header.
    pub const fn payload_size(&self) -> usize {
        self.prefix + self.record_size * self.count + self.suffix
    }

    /// Total datagram size including the header.
    pub const fn packet_size(&self) -> usize {
        HEADER_SIZE + self.payload_size()
    }

    /// Offset of record `index` from the start of the datagram.
    pub const fn record_offset(&self, index: usize) -> usize {
        HEADER_SIZE + self.prefix + index * self.record_size
    }
}

/// Layout for `id` under `packet_format`.
///
/// # Errors
///
/// [`DecodeError::UnsupportedVersion`] when no layouts exist for the format.
pub fn layout_for(id: PacketId, packet_format: u16) -> DecodeResult<PacketLayout> {
    if packet_format != PACKET_FORMAT_2021 {
        return Err(DecodeError::UnsupportedVersion(packet_format));
    }
    Ok(match id {
        PacketId::Motion => PacketLayout::per_car(60).with_suffix(120),
        PacketId::Session => PacketLayout::single(SESSION_PAYLOAD_SIZE),
        PacketId::LapData => PacketLayout::per_car(LAP_DATA_ENTRY_SIZE),
        PacketId::Event => PacketLayout::single(12),
        PacketId::Participants => PacketLayout::per_car(PARTICIPANT_ENTRY_SIZE).with_prefix(1),
        PacketId::CarSetups => PacketLayout::per_car(49),
        PacketId::CarTelemetry => PacketLayout::per_car(60).with_suffix(3),
        PacketId::CarStatus => PacketLayout::per_car(CAR_STATUS_ENTRY_SIZE),
        PacketId::FinalClassification => PacketLayout::per_car(37).with_prefix(1),
        PacketId::LobbyInfo => PacketLayout::per_car(53).with_prefix(1),
        PacketId::CarDamage => PacketLayout::per_car(39),
        PacketId::SessionHistory => PacketLayout::single(SESSION_HISTORY_PAYLOAD_SIZE),
    })
}

/// Check that `raw` is exactly as long as the layout demands.
pub(crate) fn check_length(raw: &[u8], layout: &PacketLayout) -> DecodeResult<()> {
    let expected = layout.packet_size();
    if raw.len() != expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: raw.len(),
        });
    }
    Ok(())
}
