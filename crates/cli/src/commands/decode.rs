//! List the packets in a capture.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use colored::*;
use livetiming_telemetry_f1::decode;
use serde::Serialize;

use crate::capture::CaptureReader;
use crate::commands::DecodeArgs;

#[derive(Debug, Serialize)]
struct DecodedDatagram {
    index: usize,
    timestamp_ms: u64,
    len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_uid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the decode command.
pub fn execute(args: &DecodeArgs, json: bool) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open capture '{}'", args.file.display()))?;
    let reader = CaptureReader::new(BufReader::new(file))?;

    for (index, record) in reader.enumerate().take(args.limit.unwrap_or(usize::MAX)) {
        let record = record?;
        let mut row = DecodedDatagram {
            index,
            timestamp_ms: record.timestamp_ns / 1_000_000,
            len: record.payload.len(),
            kind: None,
            session_uid: None,
            frame: None,
            error: None,
        };
        match decode(&record.payload) {
            Ok(packet) => {
                let header = packet.header();
                row.kind = Some(packet.id().name().to_string());
                row.session_uid = Some(header.session_uid);
                row.frame = Some(header.frame_identifier);
            }
            Err(err) => row.error = Some(err.to_string()),
        }
        print_row(&row, json)?;
    }
    Ok(())
}

fn print_row(row: &DecodedDatagram, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(row)?);
        return Ok(());
    }
    let prefix = format!("{:>6} {:>9}ms {:>5}B", row.index, row.timestamp_ms, row.len);
    match (&row.kind, &row.error) {
        (Some(kind), _) => println!(
            "{prefix}  {kind:<20} frame {:<8} session {:#018x}",
            row.frame.unwrap_or_default(),
            row.session_uid.unwrap_or_default()
        ),
        (None, Some(error)) => println!("{prefix}  {}", error.red()),
        (None, None) => println!("{prefix}"),
    }
    Ok(())
}
