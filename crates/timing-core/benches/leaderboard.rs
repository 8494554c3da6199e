//! Leaderboard and pit-line benchmarks for a full 20-car grid

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use livetiming_core::{
    LeaderboardEngine, LeaderboardOptions, PitDeltaOverride, PitLinePredictor, TelemetryStore,
};
use livetiming_telemetry_f1::{
    LapDataPacket, LapHistoryEntry, LapRecord, NUM_CARS, Packet, PacketHeader, PacketId,
    ParticipantRecord, ParticipantsPacket, ResultStatus, SessionHistoryPacket, SessionInfo,
    SessionPacket, Track, decode,
};

const UID: u64 = 0xBE7C;
const GRID: usize = 20;
const LAPS: usize = 30;

fn lap_data(frame: u32) -> LapDataPacket {
    let mut cars = vec![LapRecord::default(); NUM_CARS];
    for (i, lap) in cars.iter_mut().take(GRID).enumerate() {
        let position = u8::try_from(i + 1).unwrap_or(u8::MAX);
        *lap = LapRecord {
            car_position: position,
            grid_position: u8::try_from(GRID - i).unwrap_or(1),
            current_lap_num: u8::try_from(LAPS + 1).unwrap_or(u8::MAX),
            last_lap_time_ms: 90_000,
            current_lap_time_ms: 30_000,
            lap_distance: 1_700.0 - 40.0 * i as f32,
            result_status: ResultStatus::Active,
            ..LapRecord::default()
        };
    }
    LapDataPacket {
        header: PacketHeader::new(PacketId::LapData, UID, frame),
        cars,
    }
}

fn race_store() -> TelemetryStore {
    let store = TelemetryStore::new();
    let mut participants = vec![ParticipantRecord::default(); NUM_CARS];
    for (i, p) in participants.iter_mut().take(GRID).enumerate() {
        p.name = format!("DRIVER {i}");
        p.race_number = u8::try_from(i + 1).unwrap_or(0);
    }
    let mut packets = vec![
        Packet::Session(SessionPacket {
            header: PacketHeader::new(PacketId::Session, UID, 1),
            session: SessionInfo {
                track_length_m: 5_303,
                track_id: 0,
                ..SessionInfo::default()
            },
        }),
        Packet::Participants(ParticipantsPacket {
            header: PacketHeader::new(PacketId::Participants, UID, 1),
            num_active_cars: u8::try_from(GRID).unwrap_or(0),
            participants,
        }),
        Packet::LapData(lap_data(1)),
    ];
    for car in 0..GRID {
        let car_idx = u8::try_from(car).unwrap_or(0);
        let mut history =
            SessionHistoryPacket::new(PacketHeader::new(PacketId::SessionHistory, UID, 1), car_idx);
        let lap_ms = 90_000 + u32::from(car_idx) * 150;
        history.laps = vec![
            LapHistoryEntry {
                lap_time_ms: lap_ms,
                sector1_time_ms: 30_000,
                sector2_time_ms: 30_000,
                ..LapHistoryEntry::default()
            };
            LAPS
        ];
        history.num_laps = u8::try_from(LAPS).unwrap_or(0);
        history.best_lap_time_lap_num = 1;
        packets.push(Packet::SessionHistory(history));
    }
    for packet in packets {
        if let Err(err) = store.update(packet) {
            eprintln!("fixture packet rejected: {err}");
        }
    }
    store
}

fn bench_leaderboard_compute(c: &mut Criterion) {
    let store = race_store();
    let snapshot = store.snapshot();
    let engine = LeaderboardEngine::new();
    let options = LeaderboardOptions::default();

    c.bench_function("leaderboard_compute_20_cars", |b| {
        b.iter(|| {
            black_box(engine.compute(black_box(&snapshot), &options));
        })
    });
}

fn bench_lap_data_decode_and_apply(c: &mut Criterion) {
    let store = race_store();
    let mut frame = 2u32;

    c.bench_function("lap_data_decode_and_apply", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            let bytes = Packet::LapData(lap_data(frame)).to_bytes();
            if let Ok(packet) = decode(black_box(&bytes)) {
                black_box(store.update(packet).is_ok());
            }
        })
    });
}

fn bench_pit_line_prediction(c: &mut Criterion) {
    let mut predictor = PitLinePredictor::new(PitDeltaOverride::Automatic);
    for ms in (0..90_000u32).step_by(100) {
        predictor.record(ms, ms as f32 / 90_000.0 * 5_303.0);
    }

    c.bench_function("pit_line_prediction", |b| {
        b.iter(|| {
            black_box(predictor.predict_pit_line_meters(
                black_box(90_000),
                black_box(12_345),
                Some(Track::Melbourne),
            ));
        })
    });
}

criterion_group!(
    benches,
    bench_leaderboard_compute,
    bench_lap_data_decode_and_apply,
    bench_pit_line_prediction
);
criterion_main!(benches);
