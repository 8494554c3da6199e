//! Lap Data (packet id 2): timing state for all 22 cars.

use serde::{Deserialize, Serialize};

use crate::codes::{PitStatus, ResultStatus};
use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, NUM_CARS, PacketHeader, PacketId};
use crate::layout::{LAP_DATA_ENTRY_SIZE, PacketLayout, check_length, layout_for};
use crate::reader::{ByteReader, ByteWriter};

/// Timing record for one car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    /// Sector 1 time of the lap in progress (0 until sector 1 is complete).
    pub sector1_time_ms: u16,
    /// Sector 2 time of the lap in progress (0 until sector 2 is complete).
    pub sector2_time_ms: u16,
    /// Distance into the current lap in meters. Negative on an out-lap, where
    /// it counts the distance still to go before the start/finish line.
    pub lap_distance: f32,
    pub total_distance: f32,
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    pub pit_status: PitStatus,
    pub num_pit_stops: u8,
    /// Current sector, 0-based.
    pub sector: u8,
    pub current_lap_invalid: bool,
    /// Accumulated time penalties in seconds.
    pub penalties: u8,
    pub warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    /// 0 garage, 1 flying lap, 2 in lap, 3 out lap, 4 on track.
    pub driver_status: u8,
    pub result_status: ResultStatus,
    pub pit_lane_timer_active: bool,
    pub pit_lane_time_in_lane_ms: u16,
    pub pit_stop_timer_ms: u16,
    pub pit_stop_should_serve_pen: u8,
}

impl Default for LapRecord {
    fn default() -> Self {
        Self {
            last_lap_time_ms: 0,
            current_lap_time_ms: 0,
            sector1_time_ms: 0,
            sector2_time_ms: 0,
            lap_distance: 0.0,
            total_distance: 0.0,
            safety_car_delta: 0.0,
            car_position: 0,
            current_lap_num: 0,
            pit_status: PitStatus::None,
            num_pit_stops: 0,
            sector: 0,
            current_lap_invalid: false,
            penalties: 0,
            warnings: 0,
            num_unserved_drive_through_pens: 0,
            num_unserved_stop_go_pens: 0,
            grid_position: 0,
            driver_status: 0,
            result_status: ResultStatus::Invalid,
            pit_lane_timer_active: false,
            pit_lane_time_in_lane_ms: 0,
            pit_stop_timer_ms: 0,
            pit_stop_should_serve_pen: 0,
        }
    }
}

impl LapRecord {
    fn read(r: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let last_lap_time_ms = r.u32_le()?; // 0-3
        let current_lap_time_ms = r.u32_le()?; // 4-7
        let sector1_time_ms = r.u16_le()?; // 8-9
        let sector2_time_ms = r.u16_le()?; // 10-11
        let lap_distance = r.f32_le()?; // 12-15
        let total_distance = r.f32_le()?; // 16-19
        let safety_car_delta = r.f32_le()?; // 20-23
        let car_position = r.u8()?; // 24
        let current_lap_num = r.u8()?; // 25
        let pit_status_raw = r.u8()?; // 26
        let num_pit_stops = r.u8()?; // 27
        let sector = r.u8()?; // 28
        let current_lap_invalid = r.u8()? != 0; // 29
        let penalties = r.u8()?; // 30
        let warnings = r.u8()?; // 31
        let num_unserved_drive_through_pens = r.u8()?; // 32
        let num_unserved_stop_go_pens = r.u8()?; // 33
        let grid_position = r.u8()?; // 34
        let driver_status = r.u8()?; // 35
        let result_status = ResultStatus::from_wire(r.u8()?); // 36
        let pit_lane_timer_active = r.u8()? != 0; // 37
        let pit_lane_time_in_lane_ms = r.u16_le()?; // 38-39
        let pit_stop_timer_ms = r.u16_le()?; // 40-41
        let pit_stop_should_serve_pen = r.u8()?; // 42

        Ok(Self {
            last_lap_time_ms,
            current_lap_time_ms,
            sector1_time_ms,
            sector2_time_ms,
            lap_distance,
            total_distance,
            safety_car_delta,
            car_position,
            current_lap_num,
            pit_status: PitStatus::from_wire(pit_status_raw, pit_lane_timer_active),
            num_pit_stops,
            sector,
            current_lap_invalid,
            penalties,
            warnings,
            num_unserved_drive_through_pens,
            num_unserved_stop_go_pens,
            grid_position,
            driver_status,
            result_status,
            pit_lane_timer_active,
            pit_lane_time_in_lane_ms,
            pit_stop_timer_ms,
            pit_stop_should_serve_pen,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.u32_le(self.last_lap_time_ms)
            .u32_le(self.current_lap_time_ms)
            .u16_le(self.sector1_time_ms)
            .u16_le(self.sector2_time_ms)
            .f32_le(self.lap_distance)
            .f32_le(self.total_distance)
            .f32_le(self.safety_car_delta)
            .u8(self.car_position)
            .u8(self.current_lap_num)
            .u8(self.pit_status.as_wire())
            .u8(self.num_pit_stops)
            .u8(self.sector)
            .u8(u8::from(self.current_lap_invalid))
            .u8(self.penalties)
            .u8(self.warnings)
            .u8(self.num_unserved_drive_through_pens)
            .u8(self.num_unserved_stop_go_pens)
            .u8(self.grid_position)
            .u8(self.driver_status)
            .u8(self.result_status.as_wire())
            .u8(u8::from(self.pit_lane_timer_active))
            .u16_le(self.pit_lane_time_in_lane_ms)
            .u16_le(self.pit_stop_timer_ms)
            .u8(self.pit_stop_should_serve_pen);
    }

    /// Number of laps this car has completed.
    pub fn completed_laps(&self) -> u8 {
        self.current_lap_num.saturating_sub(1)
    }

    /// Lap distance with the out-lap convention undone.
    ///
    /// During an out-lap the game reports the distance still to go as a
    /// negative number; the true position is `track_length + reported`.
    pub fn corrected_lap_distance(&self, track_length_m: u16) -> f32 {
        corrected_lap_distance(self.lap_distance, track_length_m)
    }
}

/// Undo the negative out-lap distance convention.
pub fn corrected_lap_distance(reported_m: f32, track_length_m: u16) -> f32 {
    if reported_m < 0.0 {
        f32::from(track_length_m) + reported_m
    } else {
        reported_m
    }
}

/// A decoded Lap Data packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapDataPacket {
    pub header: PacketHeader,
    /// One record per car slot; always [`NUM_CARS`] long.
    pub cars: Vec<LapRecord>,
}

impl LapDataPacket {
    fn layout(header: &PacketHeader) -> DecodeResult<PacketLayout> {
        layout_for(PacketId::LapData, header.packet_format)
    }

    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = Self::layout(&header)?;
        check_length(raw, &layout)?;
        let cars = (0..NUM_CARS)
            .map(|i| LapRecord::read(&mut ByteReader::at(raw, layout.record_offset(i))))
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(Self { header, cars })
    }

    /// Encode back to the wire layout. Missing car slots are zero-filled.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE + NUM_CARS * LAP_DATA_ENTRY_SIZE);
        self.header.write(&mut w);
        for i in 0..NUM_CARS {
            match self.cars.get(i) {
                Some(car) => car.write(&mut w),
                None => {
                    w.zeros(LAP_DATA_ENTRY_SIZE);
                }
            }
        }
        w.into_inner()
    }

    pub fn car(&self, index: usize) -> Option<&LapRecord> {
        self.cars.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_lap_distance_wraps_to_track_position() {
        assert!((corrected_lap_distance(-120.0, 5000) - 4880.0).abs() < f32::EPSILON);
        assert!((corrected_lap_distance(250.0, 5000) - 250.0).abs() < f32::EPSILON);
    }

    #[test]
    fn completed_laps_never_underflows() {
        let record = LapRecord::default();
        assert_eq!(record.completed_laps(), 0);
        let record = LapRecord {
            current_lap_num: 12,
            ..LapRecord::default()
        };
        assert_eq!(record.completed_laps(), 11);
    }

    #[test]
    fn encoded_record_is_43_bytes() {
        let mut w = ByteWriter::default();
        LapRecord::default().write(&mut w);
        assert_eq!(w.len(), LAP_DATA_ENTRY_SIZE);
    }
}
