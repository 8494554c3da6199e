//! Integration tests for the `livetiming-telemetry-f1` crate.
//!
//! Covers header validation, the per-kind size table, field decoding for the
//! five typed packets and the error paths of [`decode`].

use livetiming_telemetry_f1::{
    CarStatusPacket, CarStatusRecord, DecodeError, HEADER_SIZE, LapDataPacket, LapHistoryEntry,
    LapRecord, NUM_CARS, Packet, PacketHeader, PacketId, ParticipantRecord, ParticipantsPacket,
    PitStatus, ResultStatus, SessionHistoryPacket, SessionInfo, SessionPacket, Track,
    TyreCompound, TyreStint, Weather, decode, layout_for,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SESSION_UID: u64 = 0xDEAD_BEEF_0000_0001;

fn header(id: PacketId, frame: u32) -> PacketHeader {
    PacketHeader::new(id, SESSION_UID, frame)
}

fn lap_data_with(car: usize, record: LapRecord) -> LapDataPacket {
    let mut cars = vec![LapRecord::default(); NUM_CARS];
    if let Some(slot) = cars.get_mut(car) {
        *slot = record;
    }
    LapDataPacket {
        header: header(PacketId::LapData, 100),
        cars,
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

#[test]
fn empty_datagram_is_truncated() {
    assert_eq!(
        decode(&[]),
        Err(DecodeError::Truncated {
            expected: HEADER_SIZE,
            actual: 0
        })
    );
}

#[test]
fn header_only_datagram_is_truncated_for_its_kind() {
    let raw = header(PacketId::LapData, 1).to_bytes();
    assert_eq!(
        decode(&raw),
        Err(DecodeError::Truncated {
            expected: 970,
            actual: HEADER_SIZE
        })
    );
}

#[test]
fn unknown_packet_id_is_reported() {
    let mut raw = header(PacketId::Motion, 1).to_bytes();
    if let Some(id) = raw.get_mut(5) {
        *id = 42;
    }
    raw.resize(1464, 0);
    assert_eq!(decode(&raw), Err(DecodeError::UnknownPacketId(42)));
}

#[test]
fn f1_2022_format_is_unsupported() {
    let mut h = header(PacketId::LapData, 1);
    h.packet_format = 2022;
    let mut raw = h.to_bytes();
    raw.resize(970, 0);
    assert_eq!(decode(&raw), Err(DecodeError::UnsupportedVersion(2022)));
}

#[test]
fn every_kind_decodes_at_its_published_size() -> TestResult {
    for id in PacketId::ALL {
        let size = layout_for(id, 2021)?.packet_size();
        let mut raw = header(id, 9).to_bytes();
        raw.resize(size, 0);
        let packet = decode(&raw)?;
        assert_eq!(packet.id(), id);
        assert_eq!(packet.header().frame_identifier, 9);
        assert_eq!(packet.header().session_uid, SESSION_UID);
    }
    Ok(())
}

#[test]
fn one_byte_short_is_truncated_for_every_kind() -> TestResult {
    for id in PacketId::ALL {
        let size = layout_for(id, 2021)?.packet_size();
        let mut raw = header(id, 9).to_bytes();
        raw.resize(size - 1, 0);
        assert_eq!(
            decode(&raw),
            Err(DecodeError::Truncated {
                expected: size,
                actual: size - 1
            }),
            "{id}"
        );
    }
    Ok(())
}

// ── Lap Data ─────────────────────────────────────────────────────────────────

#[test]
fn lap_data_fields_decode_per_car() -> TestResult {
    let record = LapRecord {
        last_lap_time_ms: 91_234,
        current_lap_time_ms: 12_500,
        sector1_time_ms: 28_100,
        lap_distance: 1234.5,
        total_distance: 25_000.0,
        car_position: 3,
        current_lap_num: 6,
        num_pit_stops: 1,
        sector: 1,
        penalties: 5,
        grid_position: 7,
        driver_status: 4,
        result_status: ResultStatus::Active,
        ..LapRecord::default()
    };
    let packet = lap_data_with(4, record);
    let Packet::LapData(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected lap data".into());
    };
    assert_eq!(decoded.cars.len(), NUM_CARS);
    assert_eq!(decoded.car(4), Some(&record));
    assert_eq!(decoded.car(0), Some(&LapRecord::default()));
    Ok(())
}

#[test]
fn pit_lane_timer_after_box_reads_as_exiting() -> TestResult {
    let record = LapRecord {
        pit_status: PitStatus::Exiting,
        pit_lane_timer_active: true,
        result_status: ResultStatus::Active,
        ..LapRecord::default()
    };
    let packet = lap_data_with(0, record);
    let Packet::LapData(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected lap data".into());
    };
    let car = decoded.car(0).ok_or("car 0 missing")?;
    assert_eq!(car.pit_status, PitStatus::Exiting);
    assert!(car.pit_status.is_in_pit_lane());
    Ok(())
}

#[test]
fn unrecognised_status_bytes_are_re_encoded_unchanged() -> TestResult {
    let record = LapRecord {
        pit_status: PitStatus::Unknown(5),
        result_status: ResultStatus::Unknown(12),
        ..LapRecord::default()
    };
    let bytes = lap_data_with(1, record).to_bytes();
    let decoded = decode(&bytes)?;
    let Packet::LapData(lap_data) = &decoded else {
        return Err("expected lap data".into());
    };
    assert_eq!(lap_data.car(1), Some(&record));
    assert_eq!(decoded.to_bytes(), bytes);
    Ok(())
}

#[test]
fn negative_out_lap_distance_survives_decoding() -> TestResult {
    let record = LapRecord {
        lap_distance: -120.0,
        result_status: ResultStatus::Active,
        ..LapRecord::default()
    };
    let Packet::LapData(decoded) = decode(&lap_data_with(2, record).to_bytes())? else {
        return Err("expected lap data".into());
    };
    let car = decoded.car(2).ok_or("car 2 missing")?;
    assert!((car.corrected_lap_distance(5000) - 4880.0).abs() < f32::EPSILON);
    Ok(())
}

// ── Session ──────────────────────────────────────────────────────────────────

#[test]
fn session_fields_decode() -> TestResult {
    let session = SessionInfo {
        weather: Weather::LightRain,
        track_temperature_c: 31,
        air_temperature_c: -2,
        total_laps: 58,
        track_length_m: 5281,
        session_type: 10,
        track_id: 14,
        session_time_left_s: 3600,
        session_duration_s: 7200,
        pit_speed_limit_kph: 80,
        is_spectating: true,
        spectator_car_index: 11,
        safety_car_status: 1,
        pit_stop_window_ideal_lap: 20,
        pit_stop_window_latest_lap: 26,
        pit_stop_rejoin_position: 9,
        ..SessionInfo::default()
    };
    let packet = SessionPacket {
        header: header(PacketId::Session, 2),
        session,
    };
    let Packet::Session(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected session".into());
    };
    assert_eq!(decoded.session, session);
    assert_eq!(decoded.session.track(), Some(Track::AbuDhabi));
    Ok(())
}

#[test]
fn unknown_track_id_keeps_raw_value() -> TestResult {
    let packet = SessionPacket {
        header: header(PacketId::Session, 2),
        session: SessionInfo {
            track_id: 40,
            track_length_m: 4000,
            ..SessionInfo::default()
        },
    };
    let Packet::Session(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected session".into());
    };
    assert_eq!(decoded.session.track_id, 40);
    assert_eq!(decoded.session.track(), None);
    Ok(())
}

// ── Participants ─────────────────────────────────────────────────────────────

#[test]
fn participant_names_and_teams_decode() -> TestResult {
    let mut participants = vec![ParticipantRecord::default(); NUM_CARS];
    if let Some(slot) = participants.get_mut(1) {
        *slot = ParticipantRecord {
            ai_controlled: false,
            team_id: 2,
            race_number: 33,
            name: "VERSTAPPEN".to_string(),
            your_telemetry: true,
            ..ParticipantRecord::default()
        };
    }
    let packet = ParticipantsPacket {
        header: header(PacketId::Participants, 3),
        num_active_cars: 20,
        participants,
    };
    let Packet::Participants(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected participants".into());
    };
    assert_eq!(decoded.num_active_cars, 20);
    let driver = decoded.participant(1).ok_or("participant 1 missing")?;
    assert_eq!(driver.name, "VERSTAPPEN");
    assert_eq!(driver.race_number, 33);
    assert!(driver.is_human());
    Ok(())
}

#[test]
fn invalid_utf8_name_is_replaced_not_rejected() -> TestResult {
    let packet = ParticipantsPacket {
        header: header(PacketId::Participants, 3),
        num_active_cars: 1,
        participants: vec![ParticipantRecord::default(); NUM_CARS],
    };
    let mut raw = packet.to_bytes();
    // name of car 0 starts 7 bytes into its record
    let name_offset = HEADER_SIZE + 1 + 7;
    if let Some(bytes) = raw.get_mut(name_offset..name_offset + 3) {
        bytes.copy_from_slice(&[b'A', 0xFF, b'B']);
    }
    let Packet::Participants(decoded) = decode(&raw)? else {
        return Err("expected participants".into());
    };
    let name = &decoded.participant(0).ok_or("participant 0 missing")?.name;
    assert_eq!(name, "A\u{FFFD}B");
    Ok(())
}

// ── Car Status ───────────────────────────────────────────────────────────────

#[test]
fn car_status_tyre_fields_decode() -> TestResult {
    let mut cars = vec![CarStatusRecord::default(); NUM_CARS];
    if let Some(slot) = cars.get_mut(7) {
        *slot = CarStatusRecord {
            fuel_in_tank: 42.5,
            visual_tyre_compound: 17,
            tyres_age_laps: 12,
            vehicle_fia_flags: 3,
            ..CarStatusRecord::default()
        };
    }
    let packet = CarStatusPacket {
        header: header(PacketId::CarStatus, 4),
        cars,
    };
    let Packet::CarStatus(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected car status".into());
    };
    let car = decoded.car(7).ok_or("car 7 missing")?;
    assert_eq!(car.tyre_compound(), TyreCompound::Medium);
    assert_eq!(car.tyres_age_laps, 12);
    assert_eq!(car.vehicle_fia_flags, 3);
    assert!((car.fuel_in_tank - 42.5).abs() < f32::EPSILON);
    Ok(())
}

// ── Session History ──────────────────────────────────────────────────────────

#[test]
fn session_history_keeps_only_reported_laps() -> TestResult {
    let mut packet = SessionHistoryPacket::new(header(PacketId::SessionHistory, 5), 9);
    packet.num_laps = 3;
    packet.num_tyre_stints = 1;
    packet.best_lap_time_lap_num = 2;
    packet.best_sector1_lap_num = 1;
    packet.laps = vec![
        LapHistoryEntry {
            lap_time_ms: 95_000,
            sector1_time_ms: 30_000,
            sector2_time_ms: 33_000,
            sector3_time_ms: 32_000,
            valid_flags: 0x0F,
        },
        LapHistoryEntry {
            lap_time_ms: 93_500,
            sector1_time_ms: 30_100,
            sector2_time_ms: 31_900,
            sector3_time_ms: 31_500,
            valid_flags: 0x0F,
        },
        LapHistoryEntry::default(),
    ];
    packet.tyre_stints = vec![TyreStint {
        end_lap: 255,
        actual_compound: 16,
        visual_compound: 16,
    }];

    let Packet::SessionHistory(decoded) = decode(&packet.to_bytes())? else {
        return Err("expected session history".into());
    };
    assert_eq!(decoded.car_idx, 9);
    assert_eq!(decoded.laps.len(), 3);
    assert_eq!(decoded.tyre_stints.len(), 1);
    assert_eq!(decoded.best_lap_time_ms(), Some(93_500));
    assert_eq!(decoded.best_sector_ms(1), Some(30_000));
    assert_eq!(decoded.best_sector_ms(2), None);
    assert_eq!(decoded.elapsed_ms(2), Some(188_500));
    Ok(())
}

#[test]
fn session_history_lap_count_is_capped_at_100() -> TestResult {
    let packet = SessionHistoryPacket::new(header(PacketId::SessionHistory, 5), 0);
    let mut raw = packet.to_bytes();
    // numLaps is the second payload byte
    if let Some(num_laps) = raw.get_mut(HEADER_SIZE + 1) {
        *num_laps = 200;
    }
    let Packet::SessionHistory(decoded) = decode(&raw)? else {
        return Err("expected session history".into());
    };
    assert_eq!(decoded.num_laps, 200);
    assert_eq!(decoded.laps.len(), 100);
    Ok(())
}
