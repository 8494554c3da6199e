//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use livetiming_core::{ColumnVisibility, LeaderboardDriverEntry};
use livetiming_service::LiveSnapshot;
use livetiming_telemetry_f1::{PitStatus, Weather};
use serde_json::json;

const MISSING: &str = "-";

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    });
    match serde_json::to_string(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

// ── Time formats ─────────────────────────────────────────────────────────────

/// `1:30.123`, or `59.123` under a minute.
pub fn format_lap_time(ms: u32) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    if minutes > 0 {
        format!("{minutes}:{seconds:02}.{millis:03}")
    } else {
        format!("{seconds}.{millis:03}")
    }
}

fn format_seconds(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// `+1.500`; the leader shows `Leader`.
pub fn format_gap(ms: Option<u64>, is_first: bool) -> String {
    match ms {
        Some(_) if is_first => "Leader".to_string(),
        Some(ms) => format!("+{}", format_seconds(ms)),
        None => MISSING.to_string(),
    }
}

/// Signed seconds, `+0.250` or `-1.020`.
pub fn format_delta(ms: Option<i64>) -> String {
    match ms {
        Some(ms) => {
            let sign = if ms < 0 { '-' } else { '+' };
            format!("{sign}{}", format_seconds(ms.unsigned_abs()))
        }
        None => MISSING.to_string(),
    }
}

fn format_opt_lap(ms: Option<u32>) -> String {
    ms.map_or_else(|| MISSING.to_string(), format_lap_time)
}

fn format_sectors<const N: usize>(sectors: &[Option<u16>; N]) -> String {
    sectors
        .iter()
        .map(|s| s.map_or_else(|| MISSING.to_string(), |ms| format_lap_time(u32::from(ms))))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_positions_gained(gained: i16) -> String {
    match gained {
        0 => "0".to_string(),
        g if g > 0 => format!("+{g}"),
        g => g.to_string(),
    }
}

fn format_pit(entry: &LeaderboardDriverEntry) -> String {
    let phase = match entry.pit_status {
        PitStatus::None | PitStatus::Unknown(_) => "",
        PitStatus::Entering => " IN",
        PitStatus::InPit => " BOX",
        PitStatus::Exiting => " OUT",
    };
    format!("{}{phase}", entry.pit_stops)
}

fn weather_label(weather: Weather) -> String {
    match weather {
        Weather::Clear => "Clear".to_string(),
        Weather::LightCloud => "Light cloud".to_string(),
        Weather::Overcast => "Overcast".to_string(),
        Weather::LightRain => "Light rain".to_string(),
        Weather::HeavyRain => "Heavy rain".to_string(),
        Weather::Storm => "Storm".to_string(),
        Weather::Unknown(code) => format!("Weather {code}"),
    }
}

// ── Leaderboard table ────────────────────────────────────────────────────────

/// Header row and one row per entry, honouring `columns`.
pub fn table_rows(
    entries: &[LeaderboardDriverEntry],
    columns: &ColumnVisibility,
) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["Pos".to_string(), "Driver".to_string()];
    let optional: [(bool, &str); 14] = [
        (columns.team, "Team"),
        (columns.lap, "Lap"),
        (columns.positions_gained, "+/-"),
        (columns.gap_to_leader, "Gap"),
        (columns.interval, "Int"),
        (columns.delta_best, "dBest"),
        (columns.delta_last, "dLast"),
        (columns.last_lap, "Last"),
        (columns.best_lap, "Best"),
        (columns.sectors, "Sectors"),
        (columns.live_sectors, "Live"),
        (columns.tyre, "Tyre"),
        (columns.pit, "Pit"),
        (columns.penalties, "Pen"),
    ];
    header.extend(optional.iter().filter(|(on, _)| *on).map(|(_, name)| (*name).to_string()));
    header.push("Status".to_string());

    let rows = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let cells: [(bool, String); 14] = [
                (columns.team, e.team.name().to_string()),
                (columns.lap, e.lap.to_string()),
                (columns.positions_gained, format_positions_gained(e.positions_gained)),
                (columns.gap_to_leader, format_gap(e.gap_to_leader_ms, i == 0)),
                (columns.interval, format_gap(e.interval_ms, i == 0)),
                (columns.delta_best, format_delta(e.delta_best_ms)),
                (columns.delta_last, format_delta(e.delta_last_ms)),
                (columns.last_lap, format_opt_lap(e.last_lap_ms)),
                (columns.best_lap, format_opt_lap(e.best_lap_ms)),
                (columns.sectors, format_sectors(&e.last_sectors_ms)),
                (columns.live_sectors, format_sectors(&e.live_sectors_ms)),
                (
                    columns.tyre,
                    match (e.tyre, e.tyre_age_laps) {
                        (Some(tyre), Some(age)) => format!("{} {age}", tyre.short_name()),
                        (Some(tyre), None) => tyre.short_name().to_string(),
                        _ => MISSING.to_string(),
                    },
                ),
                (columns.pit, format_pit(e)),
                (
                    columns.penalties,
                    if e.penalties_s > 0 { format!("+{}s", e.penalties_s) } else { String::new() },
                ),
            ];
            let mut row = vec![e.position.to_string(), display_name(e)];
            row.extend(cells.into_iter().filter(|(on, _)| *on).map(|(_, cell)| cell));
            row.push(e.status.label().to_string());
            row
        })
        .collect();
    (header, rows)
}

fn display_name(entry: &LeaderboardDriverEntry) -> String {
    let name = if entry.name.is_empty() {
        format!("Car {}", entry.car_index)
    } else {
        entry.name.clone()
    };
    if entry.race_number > 0 {
        format!("#{} {name}", entry.race_number)
    } else {
        name
    }
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// One line describing the session.
pub fn session_line(snapshot: &LiveSnapshot) -> String {
    let track = snapshot.track.map_or("Unknown track", |t| t.name());
    let mut parts = vec![track.to_string()];
    if let Some(weather) = snapshot.weather {
        parts.push(weather_label(weather));
    }
    if let (Some(track_c), Some(air_c)) = (snapshot.track_temperature_c, snapshot.air_temperature_c)
    {
        parts.push(format!("track {track_c}C air {air_c}C"));
    }
    if let Some(delta) = snapshot.pit_delta {
        parts.push(format!("pit delta {:.1}s", delta.seconds));
    }
    parts.push(match snapshot.pit_line_m {
        Some(m) => format!("pit line {m:.0} m"),
        None => "pit line -".to_string(),
    });
    parts.join(" | ")
}

/// Full text rendering of a snapshot. Highlighted rows are drawn in colour
/// unless `colour` is off (performance mode).
pub fn render_table(snapshot: &LiveSnapshot, columns: &ColumnVisibility, colour: bool) -> String {
    if !snapshot.is_loaded() {
        let waiting =
            format!("Waiting for session data ({} datagrams received)", snapshot.receiver.received);
        return if colour {
            format!("{}\n", waiting.yellow())
        } else {
            format!("{waiting}\n")
        };
    }

    let (header, rows) = table_rows(&snapshot.entries, columns);
    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let title = session_line(snapshot);
    let header = pad_row(&header, &widths);
    if colour {
        out.push_str(&title.bold().to_string());
        out.push('\n');
        out.push_str(&header.dimmed().to_string());
    } else {
        out.push_str(&title);
        out.push('\n');
        out.push_str(&header);
    }
    out.push('\n');
    for (entry, row) in snapshot.entries.iter().zip(&rows) {
        let line = pad_row(row, &widths);
        let line = if !colour {
            line
        } else if entry.highlighted {
            line.bold().on_blue().to_string()
        } else if entry.status.is_out() {
            line.dimmed().to_string()
        } else {
            line
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// One JSON document per line.
pub fn snapshot_json_line(snapshot: &LiveSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}
