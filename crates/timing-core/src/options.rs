//! User-selectable leaderboard options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Which rows are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    Off,
    /// Only the player's own car.
    #[default]
    OnlyMe,
    /// Every car driven by a human.
    Everyone,
}

/// Reference car for delta columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaReference {
    #[default]
    Leader,
    CarAhead,
}

/// Leaderboard refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum UpdateFrequency {
    Hz1,
    #[default]
    Hz10,
    Hz30,
    Hz60,
}

impl UpdateFrequency {
    pub const ALL: [UpdateFrequency; 4] = [Self::Hz1, Self::Hz10, Self::Hz30, Self::Hz60];

    /// # Errors
    ///
    /// [`OptionsError::InvalidUpdateFrequency`] for anything but 1, 10, 30 or 60.
    pub fn from_hz(hz: u32) -> Result<Self, OptionsError> {
        match hz {
            1 => Ok(Self::Hz1),
            10 => Ok(Self::Hz10),
            30 => Ok(Self::Hz30),
            60 => Ok(Self::Hz60),
            other => Err(OptionsError::InvalidUpdateFrequency(other)),
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz30 => 30,
            Self::Hz60 => 60,
        }
    }

    /// Time between two ticks.
    pub fn period(self) -> Duration {
        Duration::from_secs(1) / self.hz()
    }
}

impl TryFrom<u32> for UpdateFrequency {
    type Error = OptionsError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::from_hz(hz)
    }
}

impl From<UpdateFrequency> for u32 {
    fn from(frequency: UpdateFrequency) -> Self {
        frequency.hz()
    }
}

/// Columns shown by presentation layers. The engine always fills every
/// field; these flags only affect rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnVisibility {
    pub team: bool,
    pub lap: bool,
    pub positions_gained: bool,
    pub gap_to_leader: bool,
    pub interval: bool,
    pub delta_best: bool,
    pub delta_last: bool,
    pub last_lap: bool,
    pub best_lap: bool,
    pub sectors: bool,
    pub live_sectors: bool,
    pub tyre: bool,
    pub pit: bool,
    pub penalties: bool,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            team: true,
            lap: true,
            positions_gained: false,
            gap_to_leader: true,
            interval: true,
            delta_best: false,
            delta_last: false,
            last_lap: true,
            best_lap: true,
            sectors: false,
            live_sectors: false,
            tyre: true,
            pit: true,
            penalties: true,
        }
    }
}

impl ColumnVisibility {
    /// Every column switched on.
    #[must_use]
    pub fn all() -> Self {
        Self {
            team: true,
            lap: true,
            positions_gained: true,
            gap_to_leader: true,
            interval: true,
            delta_best: true,
            delta_last: true,
            last_lap: true,
            best_lap: true,
            sectors: true,
            live_sectors: true,
            tyre: true,
            pit: true,
            penalties: true,
        }
    }
}

/// Inputs to [`crate::LeaderboardEngine::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardOptions {
    pub highlight: HighlightMode,
    pub delta_reference: DeltaReference,
}

impl LeaderboardOptions {
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightMode) -> Self {
        self.highlight = highlight;
        self
    }

    #[must_use]
    pub fn with_delta_reference(mut self, delta_reference: DeltaReference) -> Self {
        self.delta_reference = delta_reference;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn only_four_frequencies_are_supported() {
        for frequency in UpdateFrequency::ALL {
            assert_eq!(UpdateFrequency::from_hz(frequency.hz()), Ok(frequency));
        }
        assert_eq!(
            UpdateFrequency::from_hz(20),
            Err(OptionsError::InvalidUpdateFrequency(20))
        );
    }

    #[test]
    fn sixty_hz_ticks_every_16ms() {
        assert_eq!(UpdateFrequency::Hz60.period(), Duration::from_nanos(16_666_666));
        assert_eq!(UpdateFrequency::Hz1.period(), Duration::from_secs(1));
    }

    #[test]
    fn frequency_serializes_as_plain_hertz() -> TestResult {
        assert_eq!(serde_json::to_string(&UpdateFrequency::Hz30)?, "30");
        let parsed: UpdateFrequency = serde_json::from_str("60")?;
        assert_eq!(parsed, UpdateFrequency::Hz60);
        assert!(serde_json::from_str::<UpdateFrequency>("15").is_err());
        Ok(())
    }

    #[test]
    fn options_use_snake_case_names() -> TestResult {
        let options = LeaderboardOptions::default()
            .with_highlight(HighlightMode::Everyone)
            .with_delta_reference(DeltaReference::CarAhead);
        let json = serde_json::to_string(&options)?;
        assert_eq!(json, r#"{"highlight":"everyone","delta_reference":"car_ahead"}"#);
        Ok(())
    }
}
