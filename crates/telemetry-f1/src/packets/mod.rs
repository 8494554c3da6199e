//! Typed packets.
//!
//! Session, Lap Data, Participants, Car Status and Session History are
//! decoded field by field. The remaining kinds are length-checked and kept
//! as [`RawPacket`] so they can be forwarded or recorded untouched.

pub mod car_status;
pub mod lap_data;
pub mod participants;
pub mod session;
pub mod session_history;

use serde::{Deserialize, Serialize};

use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, PacketHeader, PacketId};
use crate::layout::{check_length, layout_for};

pub use car_status::{CarStatusPacket, CarStatusRecord};
pub use lap_data::{LapDataPacket, LapRecord, corrected_lap_distance};
pub use participants::{ParticipantRecord, ParticipantsPacket};
pub use session::{SessionInfo, SessionPacket};
pub use session_history::{LapHistoryEntry, SessionHistoryPacket, TyreStint};

/// A packet whose payload is validated for length but not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPacket {
    pub header: PacketHeader,
    /// Bytes after the header.
    pub payload: Vec<u8>,
}

impl RawPacket {
    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = layout_for(header.packet_id, header.packet_format)?;
        check_length(raw, &layout)?;
        Ok(Self {
            header,
            payload: raw.get(HEADER_SIZE..).unwrap_or_default().to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header.to_bytes();
        out.extend_from_slice(&self.payload);
        out
    }
}

/// One decoded datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    Motion(RawPacket),
    Session(SessionPacket),
    LapData(LapDataPacket),
    Event(RawPacket),
    Participants(ParticipantsPacket),
    CarSetups(RawPacket),
    CarTelemetry(RawPacket),
    CarStatus(CarStatusPacket),
    FinalClassification(RawPacket),
    LobbyInfo(RawPacket),
    CarDamage(RawPacket),
    SessionHistory(SessionHistoryPacket),
}

impl Packet {
    pub fn header(&self) -> &PacketHeader {
        match self {
            Packet::Session(p) => &p.header,
            Packet::LapData(p) => &p.header,
            Packet::Participants(p) => &p.header,
            Packet::CarStatus(p) => &p.header,
            Packet::SessionHistory(p) => &p.header,
            Packet::Motion(p)
            | Packet::Event(p)
            | Packet::CarSetups(p)
            | Packet::CarTelemetry(p)
            | Packet::FinalClassification(p)
            | Packet::LobbyInfo(p)
            | Packet::CarDamage(p) => &p.header,
        }
    }

    pub fn id(&self) -> PacketId {
        self.header().packet_id
    }

    /// Re-encode to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Packet::Session(p) => p.to_bytes(),
            Packet::LapData(p) => p.to_bytes(),
            Packet::Participants(p) => p.to_bytes(),
            Packet::CarStatus(p) => p.to_bytes(),
            Packet::SessionHistory(p) => p.to_bytes(),
            Packet::Motion(p)
            | Packet::Event(p)
            | Packet::CarSetups(p)
            | Packet::CarTelemetry(p)
            | Packet::FinalClassification(p)
            | Packet::LobbyInfo(p)
            | Packet::CarDamage(p) => p.to_bytes(),
        }
    }
}
