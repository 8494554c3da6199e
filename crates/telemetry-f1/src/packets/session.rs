//! Session (packet id 1): track, weather and spectator state.

use serde::{Deserialize, Serialize};

use crate::codes::{Track, Weather};
use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, PacketHeader, PacketId};
use crate::layout::{MAX_MARSHAL_ZONES, SESSION_PAYLOAD_SIZE, check_length, layout_for};
use crate::reader::{ByteReader, ByteWriter};

const MARSHAL_ZONE_SIZE: usize = 5;
const WEATHER_FORECAST_BLOCK: usize = 1 + 56 * 8;

/// Session-level fields used by the timing core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub weather: Weather,
    pub track_temperature_c: i8,
    pub air_temperature_c: i8,
    pub total_laps: u8,
    /// Track length in meters; `0` until a session is loaded.
    pub track_length_m: u16,
    pub session_type: u8,
    /// Raw `m_trackId`, kept for circuits newer than [`Track`].
    pub track_id: i8,
    pub formula: u8,
    pub session_time_left_s: u16,
    pub session_duration_s: u16,
    pub pit_speed_limit_kph: u8,
    pub game_paused: bool,
    pub is_spectating: bool,
    pub spectator_car_index: u8,
    pub num_marshal_zones: u8,
    pub safety_car_status: u8,
    pub network_game: bool,
    pub pit_stop_window_ideal_lap: u8,
    pub pit_stop_window_latest_lap: u8,
    pub pit_stop_rejoin_position: u8,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            track_temperature_c: 0,
            air_temperature_c: 0,
            total_laps: 0,
            track_length_m: 0,
            session_type: 0,
            track_id: -1,
            formula: 0,
            session_time_left_s: 0,
            session_duration_s: 0,
            pit_speed_limit_kph: 0,
            game_paused: false,
            is_spectating: false,
            spectator_car_index: 255,
            num_marshal_zones: 0,
            safety_car_status: 0,
            network_game: false,
            pit_stop_window_ideal_lap: 0,
            pit_stop_window_latest_lap: 0,
            pit_stop_rejoin_position: 0,
        }
    }
}

impl SessionInfo {
    pub fn track(&self) -> Option<Track> {
        Track::from_id(self.track_id)
    }

    /// A session is loaded once the game reports a track length.
    pub fn is_loaded(&self) -> bool {
        self.track_length_m > 0
    }
}

/// A decoded Session packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPacket {
    pub header: PacketHeader,
    pub session: SessionInfo,
}

impl SessionPacket {
    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = layout_for(PacketId::Session, header.packet_format)?;
        check_length(raw, &layout)?;

        let mut r = ByteReader::at(raw, HEADER_SIZE);
        let weather = Weather::from_wire(r.u8()?); // 0
        let track_temperature_c = r.i8()?; // 1
        let air_temperature_c = r.i8()?; // 2
        let total_laps = r.u8()?; // 3
        let track_length_m = r.u16_le()?; // 4-5
        let session_type = r.u8()?; // 6
        let track_id = r.i8()?; // 7
        let formula = r.u8()?; // 8
        let session_time_left_s = r.u16_le()?; // 9-10
        let session_duration_s = r.u16_le()?; // 11-12
        let pit_speed_limit_kph = r.u8()?; // 13
        let game_paused = r.u8()? != 0; // 14
        let is_spectating = r.u8()? != 0; // 15
        let spectator_car_index = r.u8()?; // 16
        r.skip(1)?; // sliProNativeSupport (17)
        let num_marshal_zones = r.u8()?; // 18
        r.skip(MAX_MARSHAL_ZONES * MARSHAL_ZONE_SIZE)?; // 19-123
        let safety_car_status = r.u8()?; // 124
        let network_game = r.u8()? != 0; // 125
        r.skip(WEATHER_FORECAST_BLOCK)?; // 126-574
        r.skip(2)?; // forecastAccuracy, aiDifficulty (575-576)
        r.skip(12)?; // season/weekend/session link identifiers (577-588)
        let pit_stop_window_ideal_lap = r.u8()?; // 589
        let pit_stop_window_latest_lap = r.u8()?; // 590
        let pit_stop_rejoin_position = r.u8()?; // 591
        // assists and racing line (592-600) ignored

        Ok(Self {
            header,
            session: SessionInfo {
                weather,
                track_temperature_c,
                air_temperature_c,
                total_laps,
                track_length_m,
                session_type,
                track_id,
                formula,
                session_time_left_s,
                session_duration_s,
                pit_speed_limit_kph,
                game_paused,
                is_spectating,
                spectator_car_index,
                num_marshal_zones,
                safety_car_status,
                network_game,
                pit_stop_window_ideal_lap,
                pit_stop_window_latest_lap,
                pit_stop_rejoin_position,
            },
        })
    }

    /// Encode back to the wire layout; fields the decoder skips are zeroed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let s = &self.session;
        let mut w = ByteWriter::with_capacity(HEADER_SIZE + SESSION_PAYLOAD_SIZE);
        self.header.write(&mut w);
        w.u8(s.weather.as_wire())
            .i8(s.track_temperature_c)
            .i8(s.air_temperature_c)
            .u8(s.total_laps)
            .u16_le(s.track_length_m)
            .u8(s.session_type)
            .i8(s.track_id)
            .u8(s.formula)
            .u16_le(s.session_time_left_s)
            .u16_le(s.session_duration_s)
            .u8(s.pit_speed_limit_kph)
            .u8(u8::from(s.game_paused))
            .u8(u8::from(s.is_spectating))
            .u8(s.spectator_car_index)
            .u8(0)
            .u8(s.num_marshal_zones)
            .zeros(MAX_MARSHAL_ZONES * MARSHAL_ZONE_SIZE)
            .u8(s.safety_car_status)
            .u8(u8::from(s.network_game))
            .zeros(WEATHER_FORECAST_BLOCK + 2 + 12)
            .u8(s.pit_stop_window_ideal_lap)
            .u8(s.pit_stop_window_latest_lap)
            .u8(s.pit_stop_rejoin_position);
        let tail = (HEADER_SIZE + SESSION_PAYLOAD_SIZE).saturating_sub(w.len());
        w.zeros(tail);
        w.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_session_has_fixed_size() {
        let packet = SessionPacket {
            header: PacketHeader::new(PacketId::Session, 1, 1),
            session: SessionInfo::default(),
        };
        assert_eq!(packet.to_bytes().len(), 625);
    }

    #[test]
    fn unloaded_session_has_no_track() {
        let info = SessionInfo::default();
        assert!(!info.is_loaded());
        assert_eq!(info.track(), None);
    }
}
