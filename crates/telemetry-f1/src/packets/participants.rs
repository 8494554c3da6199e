//! Participants (packet id 4): driver identity per car slot.

use serde::{Deserialize, Serialize};

use crate::codes::Team;
use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, NUM_CARS, PacketHeader, PacketId};
use crate::layout::{PARTICIPANT_ENTRY_SIZE, check_length, layout_for};
use crate::reader::{ByteReader, ByteWriter};

/// Bytes reserved for the NUL-terminated UTF-8 name.
pub const NAME_FIELD_SIZE: usize = 48;

/// Identity of one car slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub ai_controlled: bool,
    pub driver_id: u8,
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: bool,
    pub race_number: u8,
    pub nationality: u8,
    pub name: String,
    /// `false` when the player restricts telemetry to "public".
    pub your_telemetry: bool,
}

impl ParticipantRecord {
    pub fn team(&self) -> Team {
        Team::from_id(self.team_id)
    }

    pub fn is_human(&self) -> bool {
        !self.ai_controlled
    }

    fn read(r: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let ai_controlled = r.u8()? != 0; // 0
        let driver_id = r.u8()?; // 1
        let network_id = r.u8()?; // 2
        let team_id = r.u8()?; // 3
        let my_team = r.u8()? != 0; // 4
        let race_number = r.u8()?; // 5
        let nationality = r.u8()?; // 6
        let name_raw = r.bytes::<NAME_FIELD_SIZE>()?; // 7-54
        let your_telemetry = r.u8()? != 0; // 55

        Ok(Self {
            ai_controlled,
            driver_id,
            network_id,
            team_id,
            my_team,
            race_number,
            nationality,
            name: decode_name(&name_raw),
            your_telemetry,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.u8(u8::from(self.ai_controlled))
            .u8(self.driver_id)
            .u8(self.network_id)
            .u8(self.team_id)
            .u8(u8::from(self.my_team))
            .u8(self.race_number)
            .u8(self.nationality)
            .bytes(&encode_name(&self.name))
            .u8(u8::from(self.your_telemetry));
    }
}

/// Name bytes up to the first NUL; invalid UTF-8 is replaced, not rejected.
fn decode_name(raw: &[u8]) -> String {
    let name = raw.split(|&b| b == 0).next().unwrap_or_default();
    String::from_utf8_lossy(name).into_owned()
}

/// Truncate on a char boundary so the field always keeps a trailing NUL.
fn encode_name(name: &str) -> [u8; NAME_FIELD_SIZE] {
    let mut out = [0u8; NAME_FIELD_SIZE];
    let mut len = 0;
    for ch in name.chars() {
        let next = len + ch.len_utf8();
        if next >= NAME_FIELD_SIZE {
            break;
        }
        len = next;
    }
    for (dst, src) in out.iter_mut().zip(name.bytes().take(len)) {
        *dst = src;
    }
    out
}

/// A decoded Participants packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantsPacket {
    pub header: PacketHeader,
    pub num_active_cars: u8,
    /// One record per car slot; always [`NUM_CARS`] long.
    pub participants: Vec<ParticipantRecord>,
}

impl ParticipantsPacket {
    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = layout_for(PacketId::Participants, header.packet_format)?;
        check_length(raw, &layout)?;
        let num_active_cars = ByteReader::at(raw, HEADER_SIZE).u8()?;
        let participants = (0..NUM_CARS)
            .map(|i| ParticipantRecord::read(&mut ByteReader::at(raw, layout.record_offset(i))))
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(Self {
            header,
            num_active_cars,
            participants,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE + 1 + NUM_CARS * PARTICIPANT_ENTRY_SIZE);
        self.header.write(&mut w);
        w.u8(self.num_active_cars);
        for i in 0..NUM_CARS {
            match self.participants.get(i) {
                Some(p) => p.write(&mut w),
                None => {
                    w.zeros(PARTICIPANT_ENTRY_SIZE);
                }
            }
        }
        w.into_inner()
    }

    pub fn participant(&self, index: usize) -> Option<&ParticipantRecord> {
        self.participants.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_stops_at_first_nul() {
        let mut raw = [0u8; NAME_FIELD_SIZE];
        raw[..8].copy_from_slice(b"HAMILTON");
        raw[9] = b'X';
        assert_eq!(decode_name(&raw), "HAMILTON");
    }

    #[test]
    fn name_without_nul_uses_whole_field() {
        let raw = [b'A'; NAME_FIELD_SIZE];
        assert_eq!(decode_name(&raw).len(), NAME_FIELD_SIZE);
    }

    #[test]
    fn long_multibyte_name_is_truncated_on_char_boundary() {
        let name = "é".repeat(30);
        let encoded = encode_name(&name);
        assert_eq!(encoded[NAME_FIELD_SIZE - 1], 0);
        let decoded = decode_name(&encoded);
        assert_eq!(decoded, "é".repeat(23));
    }

    #[test]
    fn encoded_record_is_56_bytes() {
        let mut w = ByteWriter::default();
        ParticipantRecord::default().write(&mut w);
        assert_eq!(w.len(), PARTICIPANT_ENTRY_SIZE);
    }
}
