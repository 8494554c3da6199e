//! Session History (packet id 11): lap-by-lap history for a single car.
//!
//! The game cycles through the cars, sending one of these per car every
//! few frames. Best lap and best sector references live here, not in
//! Lap Data.

use serde::{Deserialize, Serialize};

use crate::error::DecodeResult;
use crate::header::{HEADER_SIZE, PacketHeader, PacketId};
use crate::layout::{
    LAP_HISTORY_ENTRY_SIZE, MAX_LAP_HISTORY, MAX_TYRE_STINTS, SESSION_HISTORY_PAYLOAD_SIZE,
    check_length, layout_for,
};
use crate::reader::{ByteReader, ByteWriter};

const TYRE_STINT_SIZE: usize = 3;

/// Bits of [`LapHistoryEntry::valid_flags`].
pub mod lap_valid {
    pub const LAP: u8 = 0x01;
    pub const SECTOR_1: u8 = 0x02;
    pub const SECTOR_2: u8 = 0x04;
    pub const SECTOR_3: u8 = 0x08;
}

/// One recorded lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LapHistoryEntry {
    pub lap_time_ms: u32,
    pub sector1_time_ms: u16,
    pub sector2_time_ms: u16,
    pub sector3_time_ms: u16,
    pub valid_flags: u8,
}

impl LapHistoryEntry {
    pub fn is_valid(&self) -> bool {
        self.valid_flags & lap_valid::LAP != 0
    }

    /// Sector time for `sector` in `1..=3`.
    pub fn sector_ms(&self, sector: u8) -> Option<u16> {
        match sector {
            1 => Some(self.sector1_time_ms),
            2 => Some(self.sector2_time_ms),
            3 => Some(self.sector3_time_ms),
            _ => None,
        }
    }

    fn read(r: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            lap_time_ms: r.u32_le()?,     // 0-3
            sector1_time_ms: r.u16_le()?, // 4-5
            sector2_time_ms: r.u16_le()?, // 6-7
            sector3_time_ms: r.u16_le()?, // 8-9
            valid_flags: r.u8()?,         // 10
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.u32_le(self.lap_time_ms)
            .u16_le(self.sector1_time_ms)
            .u16_le(self.sector2_time_ms)
            .u16_le(self.sector3_time_ms)
            .u8(self.valid_flags);
    }
}

/// One tyre stint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TyreStint {
    /// Lap the stint ended on; `255` for the current stint.
    pub end_lap: u8,
    pub actual_compound: u8,
    pub visual_compound: u8,
}

/// A decoded Session History packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistoryPacket {
    pub header: PacketHeader,
    pub car_idx: u8,
    pub num_laps: u8,
    pub num_tyre_stints: u8,
    /// 1-based lap numbers; `0` when not set yet.
    pub best_lap_time_lap_num: u8,
    pub best_sector1_lap_num: u8,
    pub best_sector2_lap_num: u8,
    pub best_sector3_lap_num: u8,
    /// The first `num_laps` history entries (capped at 100).
    pub laps: Vec<LapHistoryEntry>,
    /// The first `num_tyre_stints` stints (capped at 8).
    pub tyre_stints: Vec<TyreStint>,
}

impl SessionHistoryPacket {
    /// Empty history for `car_idx`.
    pub fn new(header: PacketHeader, car_idx: u8) -> Self {
        Self {
            header,
            car_idx,
            num_laps: 0,
            num_tyre_stints: 0,
            best_lap_time_lap_num: 0,
            best_sector1_lap_num: 0,
            best_sector2_lap_num: 0,
            best_sector3_lap_num: 0,
            laps: Vec::new(),
            tyre_stints: Vec::new(),
        }
    }

    pub(crate) fn parse(header: PacketHeader, raw: &[u8]) -> DecodeResult<Self> {
        let layout = layout_for(PacketId::SessionHistory, header.packet_format)?;
        check_length(raw, &layout)?;

        let mut r = ByteReader::at(raw, HEADER_SIZE);
        let car_idx = r.u8()?; // 0
        let num_laps = r.u8()?; // 1
        let num_tyre_stints = r.u8()?; // 2
        let best_lap_time_lap_num = r.u8()?; // 3
        let best_sector1_lap_num = r.u8()?; // 4
        let best_sector2_lap_num = r.u8()?; // 5
        let best_sector3_lap_num = r.u8()?; // 6

        let lap_count = usize::from(num_laps).min(MAX_LAP_HISTORY);
        let mut laps = Vec::with_capacity(lap_count);
        for _ in 0..MAX_LAP_HISTORY {
            let lap = LapHistoryEntry::read(&mut r)?; // 7-1106
            if laps.len() < lap_count {
                laps.push(lap);
            }
        }

        let stint_count = usize::from(num_tyre_stints).min(MAX_TYRE_STINTS);
        let mut tyre_stints = Vec::with_capacity(stint_count);
        for _ in 0..MAX_TYRE_STINTS {
            let stint = TyreStint {
                end_lap: r.u8()?, // 1107 + 3n
                actual_compound: r.u8()?,
                visual_compound: r.u8()?,
            };
            if tyre_stints.len() < stint_count {
                tyre_stints.push(stint);
            }
        }

        Ok(Self {
            header,
            car_idx,
            num_laps,
            num_tyre_stints,
            best_lap_time_lap_num,
            best_sector1_lap_num,
            best_sector2_lap_num,
            best_sector3_lap_num,
            laps,
            tyre_stints,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE + SESSION_HISTORY_PAYLOAD_SIZE);
        self.header.write(&mut w);
        w.u8(self.car_idx)
            .u8(self.num_laps)
            .u8(self.num_tyre_stints)
            .u8(self.best_lap_time_lap_num)
            .u8(self.best_sector1_lap_num)
            .u8(self.best_sector2_lap_num)
            .u8(self.best_sector3_lap_num);
        for i in 0..MAX_LAP_HISTORY {
            match self.laps.get(i) {
                Some(lap) => lap.write(&mut w),
                None => {
                    w.zeros(LAP_HISTORY_ENTRY_SIZE);
                }
            }
        }
        for i in 0..MAX_TYRE_STINTS {
            match self.tyre_stints.get(i) {
                Some(stint) => {
                    w.u8(stint.end_lap)
                        .u8(stint.actual_compound)
                        .u8(stint.visual_compound);
                }
                None => {
                    w.zeros(TYRE_STINT_SIZE);
                }
            }
        }
        w.into_inner()
    }

    /// History entry for 1-based lap number `lap_num`.
    pub fn lap(&self, lap_num: u8) -> Option<&LapHistoryEntry> {
        let index = usize::from(lap_num).checked_sub(1)?;
        self.laps.get(index)
    }

    /// Fastest lap time so far, if one is recorded.
    pub fn best_lap_time_ms(&self) -> Option<u32> {
        self.lap(self.best_lap_time_lap_num)
            .map(|lap| lap.lap_time_ms)
            .filter(|&ms| ms > 0)
    }

    /// Best time in `sector` (`1..=3`), if one is recorded.
    pub fn best_sector_ms(&self, sector: u8) -> Option<u16> {
        let lap_num = match sector {
            1 => self.best_sector1_lap_num,
            2 => self.best_sector2_lap_num,
            3 => self.best_sector3_lap_num,
            _ => return None,
        };
        self.lap(lap_num)?.sector_ms(sector).filter(|&ms| ms > 0)
    }

    /// Total time of the first `completed_laps` laps.
    ///
    /// `None` when any of those laps is missing or has no time yet, which
    /// happens briefly after a lap completes and before the next history
    /// packet for this car arrives.
    pub fn elapsed_ms(&self, completed_laps: u8) -> Option<u64> {
        (1..=completed_laps).try_fold(0u64, |total, lap_num| {
            let ms = self.lap(lap_num)?.lap_time_ms;
            (ms > 0).then(|| total + u64::from(ms))
        })
    }

    /// Like [`elapsed_ms`](Self::elapsed_ms), but a newest lap that history
    /// has not caught up with yet is taken from `last_lap_ms` (Lap Data).
    ///
    /// Every earlier lap must still be present.
    pub fn elapsed_ms_with_last_lap(&self, completed_laps: u8, last_lap_ms: u32) -> Option<u64> {
        if let Some(total) = self.elapsed_ms(completed_laps) {
            return Some(total);
        }
        let newest_missing = self.lap(completed_laps).is_none_or(|lap| lap.lap_time_ms == 0);
        if !newest_missing || last_lap_ms == 0 {
            return None;
        }
        let before = self.elapsed_ms(completed_laps.checked_sub(1)?)?;
        Some(before + u64::from(last_lap_ms))
    }
}
