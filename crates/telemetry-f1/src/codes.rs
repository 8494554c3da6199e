//! Lookup tables for the enumerated codes the 2021 protocol sends as bytes.

use serde::{Deserialize, Serialize};

/// Circuits known to format 2021, numbered as `m_trackId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    Melbourne,
    PaulRicard,
    Shanghai,
    Sakhir,
    Catalunya,
    Monaco,
    Montreal,
    Silverstone,
    Hockenheim,
    Hungaroring,
    Spa,
    Monza,
    Singapore,
    Suzuka,
    AbuDhabi,
    Texas,
    Brazil,
    Austria,
    Sochi,
    Mexico,
    Baku,
    SakhirShort,
    SilverstoneShort,
    TexasShort,
    SuzukaShort,
    Hanoi,
    Zandvoort,
    Imola,
    Portimao,
    Jeddah,
}

impl Track {
    const ALL: [Track; 30] = [
        Track::Melbourne,
        Track::PaulRicard,
        Track::Shanghai,
        Track::Sakhir,
        Track::Catalunya,
        Track::Monaco,
        Track::Montreal,
        Track::Silverstone,
        Track::Hockenheim,
        Track::Hungaroring,
        Track::Spa,
        Track::Monza,
        Track::Singapore,
        Track::Suzuka,
        Track::AbuDhabi,
        Track::Texas,
        Track::Brazil,
        Track::Austria,
        Track::Sochi,
        Track::Mexico,
        Track::Baku,
        Track::SakhirShort,
        Track::SilverstoneShort,
        Track::TexasShort,
        Track::SuzukaShort,
        Track::Hanoi,
        Track::Zandvoort,
        Track::Imola,
        Track::Portimao,
        Track::Jeddah,
    ];

    /// Maps `m_trackId`; `-1` (unknown) and ids added after 2021 yield `None`.
    pub fn from_id(track_id: i8) -> Option<Self> {
        let idx = usize::try_from(track_id).ok()?;
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Track::Melbourne => "Melbourne",
            Track::PaulRicard => "Paul Ricard",
            Track::Shanghai => "Shanghai",
            Track::Sakhir => "Sakhir (Bahrain)",
            Track::Catalunya => "Catalunya",
            Track::Monaco => "Monaco",
            Track::Montreal => "Montreal",
            Track::Silverstone => "Silverstone",
            Track::Hockenheim => "Hockenheim",
            Track::Hungaroring => "Hungaroring",
            Track::Spa => "Spa",
            Track::Monza => "Monza",
            Track::Singapore => "Singapore",
            Track::Suzuka => "Suzuka",
            Track::AbuDhabi => "Abu Dhabi",
            Track::Texas => "Texas",
            Track::Brazil => "Brazil",
            Track::Austria => "Austria",
            Track::Sochi => "Sochi",
            Track::Mexico => "Mexico",
            Track::Baku => "Baku (Azerbaijan)",
            Track::SakhirShort => "Sakhir Short",
            Track::SilverstoneShort => "Silverstone Short",
            Track::TexasShort => "Texas Short",
            Track::SuzukaShort => "Suzuka Short",
            Track::Hanoi => "Hanoi",
            Track::Zandvoort => "Zandvoort",
            Track::Imola => "Imola",
            Track::Portimao => "Portimao",
            Track::Jeddah => "Jeddah",
        }
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Readable label colour on top of `self`: white on dark, black on light.
    pub fn contrast_text(self) -> Rgb {
        let sum = u16::from(self.r) + u16::from(self.g) + u16::from(self.b);
        if sum < 300 { Rgb::WHITE } else { Rgb::BLACK }
    }
}

/// Teams of the 2021 season by `m_teamId`. Other ids (classic cars, F2,
/// custom teams) keep their raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Mercedes,
    Ferrari,
    RedBull,
    Williams,
    AstonMartin,
    Alpine,
    AlphaTauri,
    Haas,
    McLaren,
    AlfaRomeo,
    Other(u8),
}

impl Team {
    pub fn from_id(team_id: u8) -> Self {
        match team_id {
            0 => Team::Mercedes,
            1 => Team::Ferrari,
            2 => Team::RedBull,
            3 => Team::Williams,
            4 => Team::AstonMartin,
            5 => Team::Alpine,
            6 => Team::AlphaTauri,
            7 => Team::Haas,
            8 => Team::McLaren,
            9 => Team::AlfaRomeo,
            other => Team::Other(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Mercedes => "Mercedes",
            Team::Ferrari => "Ferrari",
            Team::RedBull => "Red Bull",
            Team::Williams => "Williams",
            Team::AstonMartin => "Aston Martin",
            Team::Alpine => "Alpine",
            Team::AlphaTauri => "AlphaTauri",
            Team::Haas => "Haas",
            Team::McLaren => "McLaren",
            Team::AlfaRomeo => "Alfa Romeo",
            Team::Other(_) => "Other",
        }
    }

    pub fn colour(self) -> Rgb {
        match self {
            Team::Mercedes => Rgb::new(0, 210, 190),
            Team::Ferrari => Rgb::new(220, 0, 0),
            Team::RedBull => Rgb::new(6, 0, 239),
            Team::Williams => Rgb::new(0, 90, 255),
            Team::AstonMartin => Rgb::new(0, 111, 98),
            Team::Alpine => Rgb::new(0, 144, 255),
            Team::AlphaTauri => Rgb::new(43, 69, 98),
            Team::Haas => Rgb::new(240, 240, 240),
            Team::McLaren => Rgb::new(255, 135, 0),
            Team::AlfaRomeo => Rgb::new(144, 0, 0),
            Team::Other(_) => Rgb::GRAY,
        }
    }
}

/// Visual tyre compound (`m_visualTyreCompound`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    SuperSoft,
    Unknown(u8),
}

impl TyreCompound {
    pub fn from_visual(code: u8) -> Self {
        match code {
            16 | 20 => TyreCompound::Soft,
            17 | 21 => TyreCompound::Medium,
            18 | 22 => TyreCompound::Hard,
            7 => TyreCompound::Intermediate,
            8 | 15 => TyreCompound::Wet,
            19 => TyreCompound::SuperSoft,
            other => TyreCompound::Unknown(other),
        }
    }

    /// One-letter label as shown on timing screens.
    pub fn short_name(self) -> &'static str {
        match self {
            TyreCompound::Soft => "S",
            TyreCompound::Medium => "M",
            TyreCompound::Hard => "H",
            TyreCompound::Intermediate => "I",
            TyreCompound::Wet => "W",
            TyreCompound::SuperSoft => "SS",
            TyreCompound::Unknown(_) => "?",
        }
    }
}

/// `m_pitStatus`, extended with the exit phase (pit-lane timer still
/// running after the car left the box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitStatus {
    None,
    Entering,
    InPit,
    Exiting,
    Unknown(u8),
}

impl PitStatus {
    pub fn from_wire(pit_status: u8, pit_lane_timer_active: bool) -> Self {
        match pit_status {
            1 => PitStatus::Entering,
            2 => PitStatus::InPit,
            0 if pit_lane_timer_active => PitStatus::Exiting,
            0 => PitStatus::None,
            other => PitStatus::Unknown(other),
        }
    }

    pub fn as_wire(self) -> u8 {
        match self {
            PitStatus::None | PitStatus::Exiting => 0,
            PitStatus::Entering => 1,
            PitStatus::InPit => 2,
            PitStatus::Unknown(code) => code,
        }
    }

    pub fn is_in_pit_lane(self) -> bool {
        matches!(self, PitStatus::Entering | PitStatus::InPit | PitStatus::Exiting)
    }
}

/// `m_resultStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    Invalid,
    Inactive,
    Active,
    Finished,
    DidNotFinish,
    Disqualified,
    NotClassified,
    Retired,
    Unknown(u8),
}

impl ResultStatus {
    pub fn from_wire(code: u8) -> Self {
        match code {
            0 => ResultStatus::Invalid,
            1 => ResultStatus::Inactive,
            2 => ResultStatus::Active,
            3 => ResultStatus::Finished,
            4 => ResultStatus::DidNotFinish,
            5 => ResultStatus::Disqualified,
            6 => ResultStatus::NotClassified,
            7 => ResultStatus::Retired,
            other => ResultStatus::Unknown(other),
        }
    }

    pub fn as_wire(self) -> u8 {
        match self {
            ResultStatus::Invalid => 0,
            ResultStatus::Inactive => 1,
            ResultStatus::Active => 2,
            ResultStatus::Finished => 3,
            ResultStatus::DidNotFinish => 4,
            ResultStatus::Disqualified => 5,
            ResultStatus::NotClassified => 6,
            ResultStatus::Retired => 7,
            ResultStatus::Unknown(code) => code,
        }
    }

    /// Slot used by a car in this session.
    pub fn is_occupied(self) -> bool {
        !matches!(
            self,
            ResultStatus::Invalid | ResultStatus::Inactive | ResultStatus::Unknown(_)
        )
    }

    /// The car is out of the race and shows a fixed status instead of gaps.
    pub fn is_out(self) -> bool {
        matches!(
            self,
            ResultStatus::DidNotFinish
                | ResultStatus::Disqualified
                | ResultStatus::NotClassified
                | ResultStatus::Retired
        )
    }
}

/// `m_weather`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    LightCloud,
    Overcast,
    LightRain,
    HeavyRain,
    Storm,
    Unknown(u8),
}

impl Weather {
    pub fn from_wire(code: u8) -> Self {
        match code {
            0 => Weather::Clear,
            1 => Weather::LightCloud,
            2 => Weather::Overcast,
            3 => Weather::LightRain,
            4 => Weather::HeavyRain,
            5 => Weather::Storm,
            other => Weather::Unknown(other),
        }
    }

    pub fn as_wire(self) -> u8 {
        match self {
            Weather::Clear => 0,
            Weather::LightCloud => 1,
            Weather::Overcast => 2,
            Weather::LightRain => 3,
            Weather::HeavyRain => 4,
            Weather::Storm => 5,
            Weather::Unknown(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_ids_cover_the_2021_calendar() {
        assert_eq!(Track::from_id(0), Some(Track::Melbourne));
        assert_eq!(Track::from_id(13), Some(Track::Suzuka));
        assert_eq!(Track::from_id(29), Some(Track::Jeddah));
        assert_eq!(Track::from_id(30), None);
        assert_eq!(Track::from_id(-1), None);
    }

    #[test]
    fn contrast_text_flips_on_brightness() {
        assert_eq!(Team::RedBull.colour().contrast_text(), Rgb::WHITE);
        assert_eq!(Team::McLaren.colour().contrast_text(), Rgb::BLACK);
        assert_eq!(Rgb::new(100, 100, 99).contrast_text(), Rgb::WHITE);
        assert_eq!(Rgb::new(100, 100, 100).contrast_text(), Rgb::BLACK);
    }

    #[test]
    fn pit_status_detects_exit_phase_from_lane_timer() {
        assert_eq!(PitStatus::from_wire(0, false), PitStatus::None);
        assert_eq!(PitStatus::from_wire(1, true), PitStatus::Entering);
        assert_eq!(PitStatus::from_wire(2, true), PitStatus::InPit);
        assert_eq!(PitStatus::from_wire(0, true), PitStatus::Exiting);
    }

    #[test]
    fn result_status_classifies_out_of_race_codes() {
        for code in [4u8, 5, 6, 7] {
            assert!(ResultStatus::from_wire(code).is_out());
        }
        assert!(!ResultStatus::Active.is_out());
        assert!(!ResultStatus::Inactive.is_occupied());
        assert!(ResultStatus::Finished.is_occupied());
        assert_eq!(ResultStatus::from_wire(0), ResultStatus::Invalid);
    }

    #[test]
    fn unrecognised_status_codes_keep_their_byte() {
        let result = ResultStatus::from_wire(42);
        assert_eq!(result, ResultStatus::Unknown(42));
        assert_eq!(result.as_wire(), 42);
        assert!(!result.is_occupied());
        assert!(!result.is_out());

        let pit = PitStatus::from_wire(9, true);
        assert_eq!(pit, PitStatus::Unknown(9));
        assert_eq!(pit.as_wire(), 9);
        assert!(!pit.is_in_pit_lane());
    }

    #[test]
    fn tyre_compound_maps_f1_and_f2_visual_codes() {
        assert_eq!(TyreCompound::from_visual(16), TyreCompound::Soft);
        assert_eq!(TyreCompound::from_visual(21), TyreCompound::Medium);
        assert_eq!(TyreCompound::from_visual(7), TyreCompound::Intermediate);
        assert_eq!(TyreCompound::from_visual(99), TyreCompound::Unknown(99));
    }
}
