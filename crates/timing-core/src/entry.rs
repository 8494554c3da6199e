//! One leaderboard row.

use livetiming_telemetry_f1::{PitStatus, ResultStatus, Rgb, Team, TyreCompound};
use serde::Serialize;

/// Race state shown in place of timing for cars that are out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Running,
    InPit,
    Finished,
    DidNotFinish,
    Disqualified,
    NotClassified,
    Retired,
}

impl DriverStatus {
    pub fn from_lap(result: ResultStatus, pit: PitStatus) -> Self {
        match result {
            ResultStatus::Finished => Self::Finished,
            ResultStatus::DidNotFinish => Self::DidNotFinish,
            ResultStatus::Disqualified => Self::Disqualified,
            ResultStatus::NotClassified => Self::NotClassified,
            ResultStatus::Retired => Self::Retired,
            _ if pit.is_in_pit_lane() => Self::InPit,
            _ => Self::Running,
        }
    }

    /// Out of the race: no gaps, the label is shown instead.
    pub fn is_out(self) -> bool {
        matches!(
            self,
            Self::DidNotFinish | Self::Disqualified | Self::NotClassified | Self::Retired
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "",
            Self::InPit => "PIT",
            Self::Finished => "FIN",
            Self::DidNotFinish => "DNF",
            Self::Disqualified => "DSQ",
            Self::NotClassified => "NC",
            Self::Retired => "RET",
        }
    }
}

/// Derived per-driver row, rebuilt every tick.
///
/// Times are milliseconds. `None` means the value is not known yet (no
/// completed lap, history not received) or not applicable (car out).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardDriverEntry {
    pub car_index: u8,
    pub position: u8,
    pub name: String,
    pub race_number: u8,
    pub team: Team,
    pub team_colour: Rgb,
    pub text_colour: Rgb,
    pub is_human: bool,
    pub lap: u8,
    /// Grid position minus current position; positive means places gained.
    pub positions_gained: i16,
    pub gap_to_leader_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    /// Signed difference to the reference car's best lap.
    pub delta_best_ms: Option<i64>,
    /// Signed difference to the reference car's last lap.
    pub delta_last_ms: Option<i64>,
    pub last_lap_ms: Option<u32>,
    pub best_lap_ms: Option<u32>,
    pub last_sectors_ms: [Option<u16>; 3],
    pub best_sectors_ms: [Option<u16>; 3],
    /// Completed sectors of the lap in progress.
    pub live_sectors_ms: [Option<u16>; 2],
    /// 0-based sector the car is in.
    pub current_sector: u8,
    pub tyre: Option<TyreCompound>,
    pub tyre_age_laps: Option<u8>,
    pub pit_status: PitStatus,
    pub pit_stops: u8,
    pub status: DriverStatus,
    /// Time penalties in seconds.
    pub penalties_s: u8,
    /// Lap distance with the out-lap convention undone.
    pub track_position_m: f32,
    pub highlighted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_status_takes_precedence_over_pit() {
        assert_eq!(
            DriverStatus::from_lap(ResultStatus::Retired, PitStatus::InPit),
            DriverStatus::Retired
        );
        assert_eq!(
            DriverStatus::from_lap(ResultStatus::Active, PitStatus::Exiting),
            DriverStatus::InPit
        );
        assert_eq!(
            DriverStatus::from_lap(ResultStatus::Active, PitStatus::None),
            DriverStatus::Running
        );
    }

    #[test]
    fn finished_cars_keep_their_gaps() {
        assert!(!DriverStatus::Finished.is_out());
        assert!(DriverStatus::Disqualified.is_out());
        assert_eq!(DriverStatus::DidNotFinish.label(), "DNF");
    }
}
