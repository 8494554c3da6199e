//! Decoder for the F1 2021 UDP telemetry protocol.
//!
//! F1 2021 (packet format `2021`) broadcasts little-endian binary UDP
//! datagrams on port **20777** by default. Every datagram starts with a
//! 24-byte [`PacketHeader`]; the packet id selects one of twelve fixed
//! payload layouts.
//!
//! # Key packet types
//!
//! | Packet ID | Name            | Fields extracted                              |
//! |-----------|-----------------|-----------------------------------------------|
//! | 1         | Session         | track, length, weather, spectator state       |
//! | 2         | Lap Data        | position, lap, distance, sectors, pit status  |
//! | 4         | Participants    | name, team, race number, AI flag              |
//! | 7         | Car Status      | tyre compound and age, fuel, ERS              |
//! | 11        | Session History | per-lap times, best lap and sector references |
//!
//! All other kinds are length-checked and returned as [`RawPacket`].
//!
//! # Usage
//!
//! ```rust
//! use livetiming_telemetry_f1::{
//!     Packet, PacketHeader, PacketId, SessionInfo, SessionPacket, decode,
//! };
//!
//! let packet = SessionPacket {
//!     header: PacketHeader::new(PacketId::Session, 7, 1),
//!     session: SessionInfo { track_length_m: 5303, ..SessionInfo::default() },
//! };
//! let decoded = decode(&packet.to_bytes())?;
//! assert!(matches!(decoded, Packet::Session(s) if s.session.track_length_m == 5303));
//! # Ok::<(), livetiming_telemetry_f1::DecodeError>(())
//! ```

#![deny(static_mut_refs)]

pub mod codes;
pub mod decode;
pub mod error;
pub mod header;
pub mod layout;
pub mod packets;
pub mod reader;

pub use codes::{PitStatus, ResultStatus, Rgb, Team, Track, TyreCompound, Weather};
pub use decode::decode;
pub use error::{DecodeError, DecodeResult};
pub use header::{HEADER_SIZE, NUM_CARS, PACKET_FORMAT_2021, PacketHeader, PacketId, parse_header};
pub use layout::{MAX_PACKET_SIZE, PacketLayout, layout_for};
pub use packets::{
    CarStatusPacket, CarStatusRecord, LapDataPacket, LapHistoryEntry, LapRecord, Packet,
    ParticipantRecord, ParticipantsPacket, RawPacket, SessionHistoryPacket, SessionInfo,
    SessionPacket, TyreStint, corrected_lap_distance,
};
