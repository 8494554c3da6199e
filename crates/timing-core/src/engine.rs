//! Leaderboard aggregation.
//!
//! Order comes from the game's race positions; timing columns are derived
//! from Lap Data plus each car's Session History. The engine holds no state:
//! the same snapshot and options always produce the same rows.

use livetiming_telemetry_f1::{
    CarStatusRecord, LapRecord, ParticipantRecord, SessionHistoryPacket, Team,
};

use crate::entry::{DriverStatus, LeaderboardDriverEntry};
use crate::options::{DeltaReference, HighlightMode, LeaderboardOptions};
use crate::store::StoreSnapshot;

/// Builds leaderboard rows from a store snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderboardEngine;

/// One occupied car slot with everything the engine reads for it.
struct CarView<'a> {
    car_index: u8,
    lap: &'a LapRecord,
    participant: Option<&'a ParticipantRecord>,
    status: Option<&'a CarStatusRecord>,
    history: Option<&'a SessionHistoryPacket>,
    driver_status: DriverStatus,
    /// Race time at the car's last line crossing.
    elapsed_ms: Option<u64>,
}

impl LeaderboardEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Rows in display order.
    ///
    /// Empty when no session is loaded yet: Session, Lap Data or
    /// Participants missing, or a track length of zero. Slots at or past the
    /// Participants active-car count are never shown.
    pub fn compute(
        &self,
        snapshot: &StoreSnapshot,
        options: &LeaderboardOptions,
    ) -> Vec<LeaderboardDriverEntry> {
        let (Some(session), Some(lap_data), Some(participants)) =
            (snapshot.session(), snapshot.lap_data(), snapshot.participants())
        else {
            return Vec::new();
        };
        let track_length_m = session.session.track_length_m;
        if track_length_m == 0 {
            return Vec::new();
        }
        let car_status = snapshot.car_status();
        let active_cars = usize::from(participants.num_active_cars);

        let mut cars: Vec<CarView<'_>> = lap_data
            .cars
            .iter()
            .enumerate()
            .take(active_cars)
            .filter(|(_, lap)| lap.result_status.is_occupied())
            .filter_map(|(i, lap)| {
                let car_index = u8::try_from(i).ok()?;
                let history = snapshot.session_history(car_index);
                Some(CarView {
                    car_index,
                    lap,
                    participant: participants.participant(i),
                    status: car_status.and_then(|p| p.car(i)),
                    history,
                    driver_status: DriverStatus::from_lap(lap.result_status, lap.pit_status),
                    elapsed_ms: history.and_then(|h| {
                        h.elapsed_ms_with_last_lap(lap.completed_laps(), lap.last_lap_time_ms)
                    }),
                })
            })
            .collect();
        cars.sort_by_key(|car| (car.lap.car_position == 0, car.lap.car_position, car.car_index));

        let gaps = chain_gaps(&cars);
        let player = snapshot.player_car_index();

        let mut entries: Vec<LeaderboardDriverEntry> = cars
            .iter()
            .zip(gaps)
            .map(|(car, (gap_to_leader_ms, interval_ms))| {
                let highlighted = match options.highlight {
                    HighlightMode::Off => false,
                    HighlightMode::OnlyMe => player == Some(car.car_index),
                    HighlightMode::Everyone => {
                        car.participant.is_some_and(ParticipantRecord::is_human)
                    }
                };
                build_entry(car, track_length_m, gap_to_leader_ms, interval_ms, highlighted)
            })
            .collect();

        fill_deltas(&mut entries, options.delta_reference);
        entries
    }
}

/// Interval between two consecutive running cars, clamped at zero.
fn interval_between(ahead: &CarView<'_>, behind: &CarView<'_>) -> Option<u64> {
    let ahead_elapsed = i64::try_from(ahead.elapsed_ms?).ok()?;
    let behind_elapsed = i64::try_from(behind.elapsed_ms?).ok()?;
    let lap_diff = i64::from(ahead.lap.completed_laps()) - i64::from(behind.lap.completed_laps());
    let raw = if lap_diff == 0 {
        behind_elapsed - ahead_elapsed
    } else {
        // race time of the car ahead, rolled back to the lap count of the car behind
        let last_lap = ahead.lap.last_lap_time_ms;
        if last_lap == 0 {
            return None;
        }
        behind_elapsed - (ahead_elapsed - lap_diff * i64::from(last_lap))
    };
    Some(u64::try_from(raw).unwrap_or(0))
}

/// `(gap_to_leader, interval)` per car, in the order given.
///
/// Cars out of the race get neither and are skipped when pairing. Once an
/// interval is unknown every later gap is unknown too.
fn chain_gaps(cars: &[CarView<'_>]) -> Vec<(Option<u64>, Option<u64>)> {
    let mut out = Vec::with_capacity(cars.len());
    let mut ahead: Option<&CarView<'_>> = None;
    let mut gap: Option<u64> = Some(0);
    for car in cars {
        if car.driver_status.is_out() {
            out.push((None, None));
            continue;
        }
        let interval = match ahead {
            None => Some(0),
            Some(prev) => interval_between(prev, car),
        };
        gap = match (gap, interval) {
            (Some(g), Some(i)) if ahead.is_some() => Some(g.saturating_add(i)),
            (Some(_), Some(_)) => Some(0),
            _ => None,
        };
        out.push((gap, interval));
        ahead = Some(car);
    }
    out
}

fn non_zero_u16(ms: u16) -> Option<u16> {
    (ms > 0).then_some(ms)
}

fn build_entry(
    car: &CarView<'_>,
    track_length_m: u16,
    gap_to_leader_ms: Option<u64>,
    interval_ms: Option<u64>,
    highlighted: bool,
) -> LeaderboardDriverEntry {
    let lap = car.lap;
    let team = car.participant.map_or(Team::Other(255), ParticipantRecord::team);
    let team_colour = team.colour();

    let last_sectors_ms = car
        .history
        .and_then(|h| h.lap(lap.completed_laps()))
        .map_or([None; 3], |l| {
            [
                non_zero_u16(l.sector1_time_ms),
                non_zero_u16(l.sector2_time_ms),
                non_zero_u16(l.sector3_time_ms),
            ]
        });
    let best_sectors_ms = car.history.map_or([None; 3], |h| {
        [h.best_sector_ms(1), h.best_sector_ms(2), h.best_sector_ms(3)]
    });
    let live_sectors_ms = [
        non_zero_u16(lap.sector1_time_ms).filter(|_| lap.sector >= 1),
        non_zero_u16(lap.sector2_time_ms).filter(|_| lap.sector >= 2),
    ];

    let positions_gained = if lap.grid_position > 0 && lap.car_position > 0 {
        i16::from(lap.grid_position) - i16::from(lap.car_position)
    } else {
        0
    };

    LeaderboardDriverEntry {
        car_index: car.car_index,
        position: lap.car_position,
        name: car.participant.map(|p| p.name.clone()).unwrap_or_default(),
        race_number: car.participant.map_or(0, |p| p.race_number),
        team,
        team_colour,
        text_colour: team_colour.contrast_text(),
        is_human: car.participant.is_some_and(ParticipantRecord::is_human),
        lap: lap.current_lap_num,
        positions_gained,
        gap_to_leader_ms,
        interval_ms,
        delta_best_ms: None,
        delta_last_ms: None,
        last_lap_ms: (lap.last_lap_time_ms > 0).then_some(lap.last_lap_time_ms),
        best_lap_ms: car.history.and_then(SessionHistoryPacket::best_lap_time_ms),
        last_sectors_ms,
        best_sectors_ms,
        live_sectors_ms,
        current_sector: lap.sector,
        tyre: car.status.map(CarStatusRecord::tyre_compound),
        tyre_age_laps: car.status.map(|s| s.tyres_age_laps),
        pit_status: lap.pit_status,
        pit_stops: lap.num_pit_stops,
        status: car.driver_status,
        penalties_s: lap.penalties,
        track_position_m: lap.corrected_lap_distance(track_length_m),
        highlighted,
    }
}

fn signed_delta(driver: Option<u32>, reference: Option<u32>) -> Option<i64> {
    Some(i64::from(driver?) - i64::from(reference?))
}

/// Cars out of the race never become the car-ahead reference.
fn fill_deltas(entries: &mut [LeaderboardDriverEntry], reference: DeltaReference) {
    let leader = entries.first().map(|e| (e.best_lap_ms, e.last_lap_ms));
    let mut ahead: Option<(Option<u32>, Option<u32>)> = None;
    for entry in entries.iter_mut() {
        let own = (entry.best_lap_ms, entry.last_lap_ms);
        let target = match reference {
            DeltaReference::Leader => leader,
            DeltaReference::CarAhead => ahead,
        };
        if let Some((best, last)) = target {
            entry.delta_best_ms = signed_delta(own.0, best);
            entry.delta_last_ms = signed_delta(own.1, last);
        }
        if !entry.status.is_out() {
            ahead = Some(own);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetiming_telemetry_f1::ResultStatus;

    fn lap(position: u8, completed: u8, last_lap_ms: u32) -> LapRecord {
        LapRecord {
            car_position: position,
            current_lap_num: completed + 1,
            last_lap_time_ms: last_lap_ms,
            result_status: ResultStatus::Active,
            ..LapRecord::default()
        }
    }

    fn view<'a>(lap: &'a LapRecord, elapsed_ms: Option<u64>) -> CarView<'a> {
        CarView {
            car_index: 0,
            lap,
            participant: None,
            status: None,
            history: None,
            driver_status: DriverStatus::from_lap(lap.result_status, lap.pit_status),
            elapsed_ms,
        }
    }

    #[test]
    fn same_lap_interval_is_elapsed_difference() {
        let (a, b) = (lap(1, 5, 90_000), lap(2, 5, 91_000));
        let interval = interval_between(&view(&a, Some(450_000)), &view(&b, Some(452_300)));
        assert_eq!(interval, Some(2_300));
    }

    #[test]
    fn lapped_interval_rolls_leader_back_by_last_lap() {
        let (a, b) = (lap(1, 5, 90_000), lap(2, 4, 95_000));
        let interval = interval_between(&view(&a, Some(450_000)), &view(&b, Some(370_000)));
        assert_eq!(interval, Some(10_000));
    }

    #[test]
    fn negative_interval_clamps_to_zero() {
        let (a, b) = (lap(1, 5, 90_000), lap(2, 5, 90_000));
        let interval = interval_between(&view(&a, Some(450_000)), &view(&b, Some(449_000)));
        assert_eq!(interval, Some(0));
    }

    #[test]
    fn missing_link_breaks_the_rest_of_the_gap_chain() {
        let laps = [lap(1, 3, 90_000), lap(2, 3, 90_000), lap(3, 3, 90_000), lap(4, 3, 90_000)];
        let elapsed = [Some(270_000), None, Some(272_000), Some(273_000)];
        let cars: Vec<_> = laps.iter().zip(elapsed).map(|(l, e)| view(l, e)).collect();
        let gaps = chain_gaps(&cars);
        assert_eq!(gaps.first(), Some(&(Some(0), Some(0))));
        assert_eq!(gaps.get(1), Some(&(None, None)));
        assert_eq!(gaps.get(2), Some(&(None, None)));
        assert_eq!(gaps.get(3), Some(&(None, Some(1_000))));
    }

    #[test]
    fn retired_car_is_skipped_when_pairing() {
        let mut retired = lap(2, 1, 90_000);
        retired.result_status = ResultStatus::Retired;
        let laps = [lap(1, 3, 90_000), retired, lap(3, 3, 90_000)];
        let elapsed = [Some(270_000), Some(100_000), Some(275_000)];
        let cars: Vec<_> = laps.iter().zip(elapsed).map(|(l, e)| view(l, e)).collect();
        let gaps = chain_gaps(&cars);
        assert_eq!(gaps.get(1), Some(&(None, None)));
        assert_eq!(gaps.get(2), Some(&(Some(5_000), Some(5_000))));
    }

    #[test]
    fn empty_store_gives_empty_leaderboard() {
        let engine = LeaderboardEngine::new();
        let rows = engine.compute(&StoreSnapshot::default(), &LeaderboardOptions::default());
        assert!(rows.is_empty());
    }
}
