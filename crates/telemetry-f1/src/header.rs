//! The 24-byte header that prefixes every F1 2021 datagram.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult};
use crate::reader::{ByteReader, ByteWriter};

/// Size of the packet header for format 2021.
pub const HEADER_SIZE: usize = 24;

/// Packet format value sent by F1 2021.
pub const PACKET_FORMAT_2021: u16 = 2021;

/// Number of car slots in every per-car array.
pub const NUM_CARS: usize = 22;

/// Secondary player index used when split-screen is not active.
pub const NO_SECONDARY_PLAYER: u8 = 255;

/// Packet kinds, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PacketId {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
}

impl PacketId {
    /// Every kind, in wire order.
    pub const ALL: [PacketId; 12] = [
        PacketId::Motion,
        PacketId::Session,
        PacketId::LapData,
        PacketId::Event,
        PacketId::Participants,
        PacketId::CarSetups,
        PacketId::CarTelemetry,
        PacketId::CarStatus,
        PacketId::FinalClassification,
        PacketId::LobbyInfo,
        PacketId::CarDamage,
        PacketId::SessionHistory,
    ];

    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Zero-based slot, convenient for per-kind arrays.
    pub fn index(self) -> usize {
        usize::from(self.as_u8())
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketId::Motion => "motion",
            PacketId::Session => "session",
            PacketId::LapData => "lap_data",
            PacketId::Event => "event",
            PacketId::Participants => "participants",
            PacketId::CarSetups => "car_setups",
            PacketId::CarTelemetry => "car_telemetry",
            PacketId::CarStatus => "car_status",
            PacketId::FinalClassification => "final_classification",
            PacketId::LobbyInfo => "lobby_info",
            PacketId::CarDamage => "car_damage",
            PacketId::SessionHistory => "session_history",
        }
    }
}

impl std::fmt::Display for PacketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed packet header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: PacketId,
    pub session_uid: u64,
    /// Session timestamp in seconds.
    pub session_time: f32,
    pub frame_identifier: u32,
    pub player_car_index: u8,
    /// `255` when there is no second player.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Header for a format-2021 packet with neutral version fields.
    pub fn new(packet_id: PacketId, session_uid: u64, frame_identifier: u32) -> Self {
        Self {
            packet_format: PACKET_FORMAT_2021,
            game_major_version: 1,
            game_minor_version: 0,
            packet_version: 1,
            packet_id,
            session_uid,
            session_time: 0.0,
            frame_identifier,
            player_car_index: 0,
            secondary_player_car_index: NO_SECONDARY_PLAYER,
        }
    }

    #[must_use]
    pub fn with_player_car_index(mut self, index: u8) -> Self {
        self.player_car_index = index;
        self
    }

    #[must_use]
    pub fn with_session_time(mut self, seconds: f32) -> Self {
        self.session_time = seconds;
        self
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        w.u16_le(self.packet_format)
            .u8(self.game_major_version)
            .u8(self.game_minor_version)
            .u8(self.packet_version)
            .u8(self.packet_id.as_u8())
            .u64_le(self.session_uid)
            .f32_le(self.session_time)
            .u32_le(self.frame_identifier)
            .u8(self.player_car_index)
            .u8(self.secondary_player_car_index);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE);
        self.write(&mut w);
        w.into_inner()
    }
}

/// Header fields as read off the wire, before the packet id is validated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawHeader {
    pub packet_format: u16,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

pub(crate) fn read_raw_header(raw: &[u8]) -> DecodeResult<RawHeader> {
    if raw.len() < HEADER_SIZE {
        return Err(DecodeError::Truncated {
            expected: HEADER_SIZE,
            actual: raw.len(),
        });
    }
    let mut r = ByteReader::new(raw);
    Ok(RawHeader {
        packet_format: r.u16_le()?,     // 0-1
        game_major_version: r.u8()?,    // 2
        game_minor_version: r.u8()?,    // 3
        packet_version: r.u8()?,        // 4
        packet_id: r.u8()?,             // 5
        session_uid: r.u64_le()?,       // 6-13
        session_time: r.f32_le()?,      // 14-17
        frame_identifier: r.u32_le()?,  // 18-21
        player_car_index: r.u8()?,      // 22
        secondary_player_car_index: r.u8()?, // 23
    })
}

/// Parse the header and validate its format and packet id.
///
/// # Errors
///
/// [`DecodeError::Truncated`] when fewer than [`HEADER_SIZE`] bytes are
/// present, [`DecodeError::UnsupportedVersion`] for a format other than 2021,
/// [`DecodeError::UnknownPacketId`] for an id above 11.
pub fn parse_header(raw: &[u8]) -> DecodeResult<PacketHeader> {
    let h = read_raw_header(raw)?;
    if h.packet_format != PACKET_FORMAT_2021 {
        return Err(DecodeError::UnsupportedVersion(h.packet_format));
    }
    let packet_id =
        PacketId::from_u8(h.packet_id).ok_or(DecodeError::UnknownPacketId(h.packet_id))?;
    Ok(PacketHeader {
        packet_format: h.packet_format,
        game_major_version: h.game_major_version,
        game_minor_version: h.game_minor_version,
        packet_version: h.packet_version,
        packet_id,
        session_uid: h.session_uid,
        session_time: h.session_time,
        frame_identifier: h.frame_identifier,
        player_car_index: h.player_car_index,
        secondary_player_car_index: h.secondary_player_car_index,
    })
}
