//! Car Status (packet id 7): fuel, tyres, ERS and flags per car.

use serde::{Deserialize, Serialize};

use crate::codes::TyreCompound;
use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, NUM_CARS, PacketHeader, PacketId};
use crate::layout::{CAR_STATUS_ENTRY_SIZE, check_length, layout_for};
use crate::reader::{ByteReader, ByteWriter};

/// Status record for one car.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarStatusRecord {
    pub traction_control: u8,
    pub anti_lock_brakes: bool,
    pub fuel_mix: u8,
    pub front_brake_bias: u8,
    pub pit_limiter_status: bool,
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: bool,
    /// Meters until DRS may be enabled; `0` when not available.
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    /// Raw visual compound code, see [`CarStatusRecord::tyre_compound`].
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    /// -1 invalid, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
    pub vehicle_fia_flags: i8,
    pub ers_store_energy: f32,
    pub ers_deploy_mode: u8,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
    pub network_paused: bool,
}

impl CarStatusRecord {
    pub fn tyre_compound(&self) -> TyreCompound {
        TyreCompound::from_visual(self.visual_tyre_compound)
    }

    fn read(r: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            traction_control: r.u8()?,              // 0
            anti_lock_brakes: r.u8()? != 0,         // 1
            fuel_mix: r.u8()?,                      // 2
            front_brake_bias: r.u8()?,              // 3
            pit_limiter_status: r.u8()? != 0,       // 4
            fuel_in_tank: r.f32_le()?,              // 5-8
            fuel_capacity: r.f32_le()?,             // 9-12
            fuel_remaining_laps: r.f32_le()?,       // 13-16
            max_rpm: r.u16_le()?,                   // 17-18
            idle_rpm: r.u16_le()?,                  // 19-20
            max_gears: r.u8()?,                     // 21
            drs_allowed: r.u8()? != 0,              // 22
            drs_activation_distance: r.u16_le()?,   // 23-24
            actual_tyre_compound: r.u8()?,          // 25
            visual_tyre_compound: r.u8()?,          // 26
            tyres_age_laps: r.u8()?,                // 27
            vehicle_fia_flags: r.i8()?,             // 28
            ers_store_energy: r.f32_le()?,          // 29-32
            ers_deploy_mode: r.u8()?,               // 33
            ers_harvested_this_lap_mguk: r.f32_le()?, // 34-37
            ers_harvested_this_lap_mguh: r.f32_le()?, // 38-41
            ers_deployed_this_lap: r.f32_le()?,     // 42-45
            network_paused: r.u8()? != 0,           // 46
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.u8(self.traction_control)
            .u8(u8::from(self.anti_lock_brakes))
            .u8(self.fuel_mix)
            .u8(self.front_brake_bias)
            .u8(u8::from(self.pit_limiter_status))
            .f32_le(self.fuel_in_tank)
            .f32_le(self.fuel_capacity)
            .f32_le(self.fuel_remaining_laps)
            .u16_le(self.max_rpm)
            .u16_le(self.idle_rpm)
            .u8(self.max_gears)
            .u8(u8::from(self.drs_allowed))
            .u16_le(self.drs_activation_distance)
            .u8(self.actual_tyre_compound)
            .u8(self.visual_tyre_compound)
            .u8(self.tyres_age_laps)
            .i8(self.vehicle_fia_flags)
            .f32_le(self.ers_store_energy)
            .u8(self.ers_deploy_mode)
            .f32_le(self.ers_harvested_this_lap_mguk)
            .f32_le(self.ers_harvested_this_lap_mguh)
            .f32_le(self.ers_deployed_this_lap)
            .u8(u8::from(self.network_paused));
    }
}

/// A decoded Car Status packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarStatusPacket {
    pub header: PacketHeader,
    /// One record per car slot; always [`NUM_CARS`] long.
    pub cars: Vec<CarStatusRecord>,
}

impl CarStatusPacket {
    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = layout_for(PacketId::CarStatus, header.packet_format)?;
        check_length(raw, &layout)?;
        let cars = (0..NUM_CARS)
            .map(|i| CarStatusRecord::read(&mut ByteReader::at(raw, layout.record_offset(i))))
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(Self { header, cars })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE + NUM_CARS * CAR_STATUS_ENTRY_SIZE);
        self.header.write(&mut w);
        for i in 0..NUM_CARS {
            match self.cars.get(i) {
                Some(car) => car.write(&mut w),
                None => {
                    w.zeros(CAR_STATUS_ENTRY_SIZE);
                }
            }
        }
        w.into_inner()
    }

    pub fn car(&self, index: usize) -> Option<&CarStatusRecord> {
        self.cars.get(index)
    }
}
