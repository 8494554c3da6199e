//! Datagram entry point.

use crate::error::DecodeResult;
use crate::header::{PacketId, parse_header};
use crate::packets::{
    CarStatusPacket, LapDataPacket, Packet, ParticipantsPacket, RawPacket, SessionHistoryPacket,
    SessionPacket,
};

/// Decode one UDP datagram.
///
/// Pure function of its input: no allocation beyond the returned packet and
/// no shared state.
///
/// # Errors
///
/// Any [`crate::DecodeError`]: short or mis-sized datagrams, unknown packet
/// ids and unsupported packet formats.
pub fn decode(raw: &[u8]) -> DecodeResult<Packet> {
    let header = parse_header(raw)?;
    Ok(match header.packet_id {
        PacketId::Session => Packet::Session(SessionPacket::parse(header, raw)?),
        PacketId::LapData => Packet::LapData(LapDataPacket::parse(header, raw)?),
        PacketId::Participants => Packet::Participants(ParticipantsPacket::parse(header, raw)?),
        PacketId::CarStatus => Packet::CarStatus(CarStatusPacket::parse(header, raw)?),
        PacketId::SessionHistory => {
            Packet::SessionHistory(SessionHistoryPacket::parse(header, raw)?)
        }
        PacketId::Motion => Packet::Motion(RawPacket::parse(header, raw)?),
        PacketId::Event => Packet::Event(RawPacket::parse(header, raw)?),
        PacketId::CarSetups => Packet::CarSetups(RawPacket::parse(header, raw)?),
        PacketId::CarTelemetry => Packet::CarTelemetry(RawPacket::parse(header, raw)?),
        PacketId::FinalClassification => {
            Packet::FinalClassification(RawPacket::parse(header, raw)?)
        }
        PacketId::LobbyInfo => Packet::LobbyInfo(RawPacket::parse(header, raw)?),
        PacketId::CarDamage => Packet::CarDamage(RawPacket::parse(header, raw)?),
    })
}
