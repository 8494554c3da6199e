//! Circular track map geometry.
//!
//! Each car sits on a unit circle at an angle proportional to its lap
//! distance, with the start/finish line at the bottom. Rendering is left to
//! the caller; this module only produces coordinates.

use std::f64::consts::TAU;

use livetiming_telemetry_f1::Rgb;
use serde::Serialize;

use crate::entry::LeaderboardDriverEntry;

/// Angle in radians for `position_m` on a track of `track_length_m`.
///
/// `None` for an unloaded track (length 0).
pub fn angle_from_position(position_m: f32, track_length_m: u16) -> Option<f64> {
    if track_length_m == 0 {
        return None;
    }
    let fraction = f64::from(position_m) / f64::from(track_length_m);
    Some(TAU * (fraction + 0.25))
}

/// Unit-circle coordinates for `angle` (y grows downwards, as on screen).
pub fn unit_circle(angle: f64) -> (f64, f64) {
    (angle.cos(), angle.sin())
}

/// A car placed on the track map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackMapPoint {
    pub car_index: u8,
    pub position: u8,
    pub team_colour: Rgb,
    /// Colour for the position label drawn on top of the team colour.
    pub text_colour: Rgb,
    pub track_position_m: f32,
    pub angle_rad: f64,
    pub x: f64,
    pub y: f64,
    pub highlighted: bool,
}

/// The predicted pit line on the track map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitLinePoint {
    pub track_position_m: f32,
    pub angle_rad: f64,
    pub x: f64,
    pub y: f64,
}

impl PitLinePoint {
    pub fn new(track_position_m: f32, track_length_m: u16) -> Option<Self> {
        let angle_rad = angle_from_position(track_position_m, track_length_m)?;
        let (x, y) = unit_circle(angle_rad);
        Some(Self {
            track_position_m,
            angle_rad,
            x,
            y,
        })
    }
}

/// Map points for every row of a leaderboard.
pub fn track_map_points(
    entries: &[LeaderboardDriverEntry],
    track_length_m: u16,
) -> Vec<TrackMapPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let angle_rad = angle_from_position(entry.track_position_m, track_length_m)?;
            let (x, y) = unit_circle(angle_rad);
            Some(TrackMapPoint {
                car_index: entry.car_index,
                position: entry.position,
                team_colour: entry.team_colour,
                text_colour: entry.text_colour,
                track_position_m: entry.track_position_m,
                angle_rad,
                x,
                y,
                highlighted: entry.highlighted,
            })
        })
        .collect()
}
