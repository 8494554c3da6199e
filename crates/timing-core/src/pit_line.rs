//! Pit-entry line prediction.
//!
//! A stop costs roughly a fixed amount of time per circuit (the pit delta).
//! Looking that far back in the tracked car's own history gives the track
//! position it held one pit delta ago, which is where a driver following at
//! that distance should start braking for the pit lane.

use livetiming_telemetry_f1::Track;
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::history::{PositionHistoryBuffer, bucket_index};

/// Delta used for circuits missing from [`Track`].
pub const FALLBACK_PIT_DELTA_S: f32 = 25.0;

/// Where a pit delta value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitDeltaSource {
    /// Timed from real stops.
    Measured,
    /// Nominal value for a circuit without timing data.
    Placeholder,
    /// Track unknown to this build.
    Fallback,
    /// Set manually for the session.
    Override,
}

/// Time lost by a stop, in seconds, and where the number came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitDelta {
    pub seconds: f32,
    pub source: PitDeltaSource,
}

impl PitDelta {
    const fn measured(seconds: f32) -> Self {
        Self {
            seconds,
            source: PitDeltaSource::Measured,
        }
    }

    const fn placeholder(seconds: f32) -> Self {
        Self {
            seconds,
            source: PitDeltaSource::Placeholder,
        }
    }

    /// Delta in whole milliseconds.
    pub fn millis(&self) -> i64 {
        (f64::from(self.seconds) * 1000.0).round() as i64
    }
}

/// Nominal pit delta for `track`.
pub fn track_pit_delta(track: Option<Track>) -> PitDelta {
    let Some(track) = track else {
        return PitDelta {
            seconds: FALLBACK_PIT_DELTA_S,
            source: PitDeltaSource::Fallback,
        };
    };
    match track {
        Track::Melbourne => PitDelta::measured(22.5),
        Track::PaulRicard => PitDelta::placeholder(25.0),
        Track::Shanghai => PitDelta::measured(23.0),
        Track::Sakhir => PitDelta::measured(24.6),
        Track::Catalunya => PitDelta::measured(22.5),
        Track::Monaco => PitDelta::measured(25.0),
        Track::Montreal => PitDelta::measured(23.6),
        Track::Silverstone => PitDelta::measured(24.7),
        Track::Hockenheim => PitDelta::placeholder(25.0),
        Track::Hungaroring => PitDelta::measured(22.0),
        Track::Spa => PitDelta::measured(23.0),
        Track::Monza => PitDelta::measured(25.0),
        Track::Singapore => PitDelta::measured(29.2),
        Track::Suzuka => PitDelta::measured(23.5),
        Track::AbuDhabi => PitDelta::measured(22.0),
        Track::Texas => PitDelta::placeholder(25.0),
        Track::Brazil => PitDelta::measured(24.5),
        Track::Austria => PitDelta::measured(22.5),
        Track::Sochi => PitDelta::measured(30.5),
        Track::Mexico => PitDelta::measured(22.8),
        Track::Baku => PitDelta::placeholder(25.0),
        Track::SakhirShort
        | Track::SilverstoneShort
        | Track::TexasShort
        | Track::SuzukaShort
        | Track::Hanoi
        | Track::Zandvoort
        | Track::Imola
        | Track::Portimao
        | Track::Jeddah => PitDelta::placeholder(20.0),
    }
}

/// Per-session choice between the track table and a manual delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitDeltaOverride {
    #[default]
    Automatic,
    Seconds(f32),
}

impl PitDeltaOverride {
    /// Manual delta, validated.
    ///
    /// # Errors
    ///
    /// [`OptionsError::InvalidPitDelta`] unless `seconds` is finite and > 0.
    pub fn seconds(seconds: f32) -> Result<Self, OptionsError> {
        let value = Self::Seconds(seconds);
        value.validate()?;
        Ok(value)
    }

    /// # Errors
    ///
    /// [`OptionsError::InvalidPitDelta`] for a non-finite or non-positive
    /// manual delta.
    pub fn validate(&self) -> Result<(), OptionsError> {
        match *self {
            Self::Seconds(s) if !s.is_finite() || s <= 0.0 => Err(OptionsError::InvalidPitDelta(s)),
            _ => Ok(()),
        }
    }
}

/// Owns the tracked car's position history and predicts the pit line.
#[derive(Debug, Clone, Default)]
pub struct PitLinePredictor {
    history: PositionHistoryBuffer,
    delta_override: PitDeltaOverride,
}

impl PitLinePredictor {
    #[must_use]
    pub fn new(delta_override: PitDeltaOverride) -> Self {
        Self {
            history: PositionHistoryBuffer::new(),
            delta_override,
        }
    }

    pub fn delta_override(&self) -> PitDeltaOverride {
        self.delta_override
    }

    /// # Errors
    ///
    /// [`OptionsError::InvalidPitDelta`] for an invalid manual delta; the
    /// previous override is kept.
    pub fn set_delta_override(
        &mut self,
        delta_override: PitDeltaOverride,
    ) -> Result<(), OptionsError> {
        delta_override.validate()?;
        self.delta_override = delta_override;
        Ok(())
    }

    pub fn history(&self) -> &PositionHistoryBuffer {
        &self.history
    }

    /// Record the tracked car's corrected position at `elapsed_ms` into the lap.
    pub fn record(&mut self, elapsed_ms: u32, position_m: f32) -> bool {
        self.history.record(elapsed_ms, position_m)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Delta in effect for `track`.
    pub fn effective_delta(&self, track: Option<Track>) -> PitDelta {
        match self.delta_override {
            PitDeltaOverride::Seconds(seconds) => PitDelta {
                seconds,
                source: PitDeltaSource::Override,
            },
            PitDeltaOverride::Automatic => track_pit_delta(track),
        }
    }

    /// History slot the pit line reads from, if it lies inside the buffer.
    pub fn pit_line_index(
        &self,
        last_lap_ms: u32,
        current_lap_ms: u32,
        track: Option<Track>,
    ) -> Option<usize> {
        let delta_ms = self.effective_delta(track).millis();
        let mut target = i64::from(current_lap_ms) - delta_ms;
        if target < 0 {
            target += i64::from(last_lap_ms);
        }
        let target = u32::try_from(target).ok()?;
        bucket_index(target)
    }

    /// Track position in meters where the pit line should be drawn.
    ///
    /// `None` means "do not draw": the target time falls outside the buffer
    /// or no sample was ever recorded there.
    pub fn predict_pit_line_meters(
        &self,
        last_lap_ms: u32,
        current_lap_ms: u32,
        track: Option<Track>,
    ) -> Option<f32> {
        let index = self.pit_line_index(last_lap_ms, current_lap_ms, track)?;
        self.history.slot(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_into_previous_lap_after_crossing_the_line() {
        let mut predictor = PitLinePredictor::default();
        predictor.record(72_500, 4_100.0);
        assert_eq!(predictor.pit_line_index(90_000, 5_000, Some(Track::Melbourne)), Some(725));
        assert_eq!(
            predictor.predict_pit_line_meters(90_000, 5_000, Some(Track::Melbourne)),
            Some(4_100.0)
        );
    }

    #[test]
    fn same_lap_lookup_when_far_enough_into_the_lap() {
        let mut predictor = PitLinePredictor::default();
        predictor.record(27_500, 1_200.0);
        assert_eq!(
            predictor.predict_pit_line_meters(0, 50_000, Some(Track::Melbourne)),
            Some(1_200.0)
        );
    }

    #[test]
    fn unwritten_slot_means_no_line() {
        let predictor = PitLinePredictor::default();
        assert_eq!(predictor.predict_pit_line_meters(90_000, 5_000, Some(Track::Monza)), None);
    }

    #[test]
    fn no_previous_lap_means_no_line() {
        let predictor = PitLinePredictor::default();
        assert_eq!(predictor.pit_line_index(0, 5_000, Some(Track::Monza)), None);
    }

    #[test]
    fn target_beyond_buffer_means_no_line() {
        let predictor = PitLinePredictor::new(PitDeltaOverride::Seconds(1.0));
        assert_eq!(predictor.pit_line_index(0, 300_000, None), None);
    }

    #[test]
    fn override_replaces_track_value() -> Result<(), OptionsError> {
        let mut predictor = PitLinePredictor::default();
        predictor.set_delta_override(PitDeltaOverride::seconds(18.0)?)?;
        let delta = predictor.effective_delta(Some(Track::Singapore));
        assert_eq!(delta.source, PitDeltaSource::Override);
        assert_eq!(delta.millis(), 18_000);
        Ok(())
    }

    #[test]
    fn invalid_override_is_refused_and_previous_kept() {
        let mut predictor = PitLinePredictor::new(PitDeltaOverride::Seconds(20.0));
        assert_eq!(
            predictor.set_delta_override(PitDeltaOverride::Seconds(0.0)),
            Err(OptionsError::InvalidPitDelta(0.0))
        );
        assert!(PitDeltaOverride::seconds(f32::NAN).is_err());
        assert_eq!(predictor.delta_override(), PitDeltaOverride::Seconds(20.0));
    }

    #[test]
    fn table_flags_tracks_without_data() {
        assert_eq!(track_pit_delta(Some(Track::Baku)).source, PitDeltaSource::Placeholder);
        assert_eq!(track_pit_delta(Some(Track::Singapore)).millis(), 29_200);
        assert_eq!(track_pit_delta(None).source, PitDeltaSource::Fallback);
        assert_eq!(track_pit_delta(None).millis(), 25_000);
    }
}
