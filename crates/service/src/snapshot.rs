//! Published view of the live timing state, rebuilt every tick.

use livetiming_core::{
    LeaderboardDriverEntry, LeaderboardEngine, LeaderboardOptions, PitDelta, PitLinePoint,
    PitLinePredictor, StoreSnapshot, TrackMapPoint, track_map_points,
};
use livetiming_telemetry_f1::{Track, Weather};
use serde::Serialize;

use crate::receiver::ReceiverCounters;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveSnapshot {
    /// Ticks since the service started; 0 for the initial empty snapshot.
    pub tick: u64,
    pub session_uid: Option<u64>,
    pub track: Option<Track>,
    pub track_length_m: u16,
    pub weather: Option<Weather>,
    pub track_temperature_c: Option<i8>,
    pub air_temperature_c: Option<i8>,
    pub tracked_car_index: Option<u8>,
    /// Pit delta in effect for the current track.
    pub pit_delta: Option<PitDelta>,
    /// Where the tracked car should start its stop; `None` means do not draw.
    pub pit_line_m: Option<f32>,
    pub pit_line_point: Option<PitLinePoint>,
    pub entries: Vec<LeaderboardDriverEntry>,
    pub track_map: Vec<TrackMapPoint>,
    pub receiver: ReceiverCounters,
}

impl LiveSnapshot {
    /// Build the view for `tick` from one store snapshot.
    pub fn build(
        tick: u64,
        store: &StoreSnapshot,
        predictor: &PitLinePredictor,
        engine: &LeaderboardEngine,
        options: &LeaderboardOptions,
        receiver: ReceiverCounters,
    ) -> Self {
        let entries = engine.compute(store, options);
        let session = store.session().map(|p| p.session);
        let track_length_m = session.map_or(0, |s| s.track_length_m);
        let track = session.and_then(|s| s.track());

        let pit_line_m = store.tracked_lap().and_then(|lap| {
            predictor.predict_pit_line_meters(lap.last_lap_time_ms, lap.current_lap_time_ms, track)
        });

        Self {
            tick,
            session_uid: store.session_uid(),
            track,
            track_length_m,
            weather: session.map(|s| s.weather),
            track_temperature_c: session.map(|s| s.track_temperature_c),
            air_temperature_c: session.map(|s| s.air_temperature_c),
            tracked_car_index: store.tracked_car_index(),
            pit_delta: session.map(|_| predictor.effective_delta(track)),
            pit_line_m,
            pit_line_point: pit_line_m.and_then(|m| PitLinePoint::new(m, track_length_m)),
            track_map: track_map_points(&entries, track_length_m),
            entries,
            receiver,
        }
    }

    /// A session is loaded and the leaderboard has rows.
    pub fn is_loaded(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Row of the tracked car.
    pub fn tracked_entry(&self) -> Option<&LeaderboardDriverEntry> {
        let index = self.tracked_car_index?;
        self.entries.iter().find(|e| e.car_index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetiming_core::{PitDeltaSource, TelemetryStore};
    use livetiming_telemetry_f1::{
        LapDataPacket, LapRecord, NUM_CARS, Packet, PacketHeader, PacketId, SessionInfo,
        SessionPacket,
    };

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn build(store: &TelemetryStore, predictor: &PitLinePredictor) -> LiveSnapshot {
        LiveSnapshot::build(
            7,
            &store.snapshot(),
            predictor,
            &LeaderboardEngine::new(),
            &LeaderboardOptions::default(),
            ReceiverCounters::default(),
        )
    }

    #[test]
    fn empty_store_gives_an_unloaded_snapshot() {
        let snapshot = build(&TelemetryStore::new(), &PitLinePredictor::default());
        assert_eq!(snapshot.tick, 7);
        assert!(!snapshot.is_loaded());
        assert_eq!(snapshot.pit_delta, None);
        assert_eq!(snapshot.pit_line_m, None);
        assert!(snapshot.track_map.is_empty());
    }

    #[test]
    fn pit_line_follows_the_tracked_car() -> TestResult {
        let store = TelemetryStore::new();
        store.update(Packet::Session(SessionPacket {
            header: PacketHeader::new(PacketId::Session, 1, 1),
            session: SessionInfo {
                track_length_m: 5000,
                // Melbourne, measured 22.5 s
                track_id: 0,
                track_temperature_c: 31,
                ..SessionInfo::default()
            },
        }))?;
        let mut cars = vec![LapRecord::default(); NUM_CARS];
        if let Some(car) = cars.get_mut(2) {
            car.last_lap_time_ms = 90_000;
            car.current_lap_time_ms = 5_000;
        }
        store.update(Packet::LapData(LapDataPacket {
            header: PacketHeader::new(PacketId::LapData, 1, 2).with_player_car_index(2),
            cars,
        }))?;
        let mut predictor = PitLinePredictor::default();
        predictor.record(72_500, 2_500.0);

        let snapshot = build(&store, &predictor);
        assert_eq!(snapshot.track, Some(Track::Melbourne));
        assert_eq!(snapshot.track_temperature_c, Some(31));
        assert_eq!(snapshot.tracked_car_index, Some(2));
        assert_eq!(snapshot.pit_delta.map(|d| d.source), Some(PitDeltaSource::Measured));
        assert_eq!(snapshot.pit_line_m, Some(2_500.0));
        let point = snapshot.pit_line_point.ok_or("no pit line point")?;
        // half a lap: top of the circle
        assert!((point.y + 1.0).abs() < 1e-9);
        Ok(())
    }
}
