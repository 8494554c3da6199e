//! Race fixtures shared by the integration tests.

use livetiming_core::TelemetryStore;
use livetiming_telemetry_f1::{
    CarStatusPacket, CarStatusRecord, LapDataPacket, LapHistoryEntry, LapRecord, NUM_CARS, Packet,
    PacketHeader, PacketId, ParticipantRecord, ParticipantsPacket, ResultStatus,
    SessionHistoryPacket, SessionInfo, SessionPacket,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const SESSION_UID: u64 = 0x2021_0000_0000_00AA;
pub const TRACK_LENGTH_M: u16 = 5000;

/// One car in a fixture race; its slot index is its position in the slice.
#[derive(Debug, Clone)]
pub struct Car {
    pub position: u8,
    pub grid: u8,
    pub lap_times_ms: Vec<u32>,
    pub status: ResultStatus,
    pub ai: bool,
    pub name: &'static str,
    pub lap_distance: f32,
}

impl Car {
    pub fn new(position: u8, lap_times_ms: &[u32]) -> Self {
        Self {
            position,
            grid: position,
            lap_times_ms: lap_times_ms.to_vec(),
            status: ResultStatus::Active,
            ai: true,
            name: "DRIVER",
            lap_distance: 100.0,
        }
    }

    pub fn human(mut self, name: &'static str) -> Self {
        self.ai = false;
        self.name = name;
        self
    }

    pub fn with_status(mut self, status: ResultStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_grid(mut self, grid: u8) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_lap_distance(mut self, lap_distance: f32) -> Self {
        self.lap_distance = lap_distance;
        self
    }

    fn lap_record(&self) -> LapRecord {
        let completed = u8::try_from(self.lap_times_ms.len()).unwrap_or(u8::MAX);
        LapRecord {
            last_lap_time_ms: self.lap_times_ms.last().copied().unwrap_or(0),
            car_position: self.position,
            current_lap_num: completed.saturating_add(1),
            grid_position: self.grid,
            lap_distance: self.lap_distance,
            result_status: self.status,
            ..LapRecord::default()
        }
    }

    fn history(&self, car_idx: u8, frame: u32) -> SessionHistoryPacket {
        let mut history = SessionHistoryPacket::new(
            PacketHeader::new(PacketId::SessionHistory, SESSION_UID, frame),
            car_idx,
        );
        history.laps = self
            .lap_times_ms
            .iter()
            .map(|&lap_time_ms| LapHistoryEntry {
                lap_time_ms,
                sector1_time_ms: u16::try_from(lap_time_ms / 3).unwrap_or(0),
                sector2_time_ms: u16::try_from(lap_time_ms / 3).unwrap_or(0),
                sector3_time_ms: u16::try_from(lap_time_ms - 2 * (lap_time_ms / 3)).unwrap_or(0),
                valid_flags: 0x0F,
            })
            .collect();
        // lap in progress
        history.laps.push(LapHistoryEntry::default());
        history.num_laps = u8::try_from(history.laps.len()).unwrap_or(u8::MAX);
        let best = self
            .lap_times_ms
            .iter()
            .enumerate()
            .min_by_key(|(_, ms)| **ms)
            .map_or(0, |(i, _)| u8::try_from(i + 1).unwrap_or(0));
        history.best_lap_time_lap_num = best;
        history.best_sector1_lap_num = best;
        history.best_sector2_lap_num = best;
        history.best_sector3_lap_num = best;
        history
    }
}

fn session_packet(frame: u32, player: u8, track_length_m: u16) -> Packet {
    Packet::Session(SessionPacket {
        header: PacketHeader::new(PacketId::Session, SESSION_UID, frame)
            .with_player_car_index(player),
        session: SessionInfo {
            track_length_m,
            track_id: 0,
            total_laps: 50,
            ..SessionInfo::default()
        },
    })
}

/// Packets describing `cars`, in the order a game would send them.
pub fn race_packets(cars: &[Car], player: u8, track_length_m: u16) -> Vec<Packet> {
    let header =
        |id, frame| PacketHeader::new(id, SESSION_UID, frame).with_player_car_index(player);

    let mut laps = vec![LapRecord::default(); NUM_CARS];
    let mut participants = vec![ParticipantRecord::default(); NUM_CARS];
    let mut statuses = vec![CarStatusRecord::default(); NUM_CARS];
    for ((car, lap), (participant, status)) in cars
        .iter()
        .zip(laps.iter_mut())
        .zip(participants.iter_mut().zip(statuses.iter_mut()))
    {
        *lap = car.lap_record();
        *participant = ParticipantRecord {
            ai_controlled: car.ai,
            team_id: 0,
            race_number: car.position,
            name: car.name.to_string(),
            ..ParticipantRecord::default()
        };
        *status = CarStatusRecord {
            visual_tyre_compound: 16,
            tyres_age_laps: 4,
            ..CarStatusRecord::default()
        };
    }

    let mut packets = vec![
        session_packet(1, player, track_length_m),
        Packet::Participants(ParticipantsPacket {
            header: header(PacketId::Participants, 1),
            num_active_cars: u8::try_from(cars.len()).unwrap_or(0),
            participants,
        }),
        Packet::CarStatus(CarStatusPacket {
            header: header(PacketId::CarStatus, 1),
            cars: statuses,
        }),
        Packet::LapData(LapDataPacket {
            header: header(PacketId::LapData, 1),
            cars: laps,
        }),
    ];
    for (i, car) in cars.iter().enumerate() {
        let car_idx = u8::try_from(i).unwrap_or(0);
        packets.push(Packet::SessionHistory(car.history(car_idx, 1)));
    }
    packets
}

/// A store loaded with one frame of `cars`.
pub fn race(cars: &[Car], player: u8) -> Result<TelemetryStore, livetiming_core::StoreError> {
    let store = TelemetryStore::new();
    for packet in race_packets(cars, player, TRACK_LENGTH_M) {
        store.update(packet)?;
    }
    Ok(store)
}
