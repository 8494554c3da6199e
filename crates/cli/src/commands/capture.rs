//! Record raw datagrams for later replay.

use std::fs::File;
use std::io::BufWriter;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use livetiming_service::ServiceConfig;
use livetiming_telemetry_f1::MAX_PACKET_SIZE;
use serde::Serialize;
use tokio::net::UdpSocket;

use crate::capture::CaptureWriter;
use crate::commands::CaptureArgs;

#[derive(Debug, Serialize)]
struct CaptureSummary {
    listen: String,
    duration_seconds: u64,
    packets_captured: u64,
    output: String,
}

/// Execute the capture command.
pub async fn execute(args: &CaptureArgs, config: ServiceConfig, json: bool) -> Result<()> {
    let bind_addr = SocketAddr::new(
        args.bind.unwrap_or(config.bind_address),
        args.port.unwrap_or(config.udp_port),
    );
    let socket = UdpSocket::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind UDP capture socket at {bind_addr}"))?;
    let listen = socket.local_addr()?;

    let file = File::create(&args.output).with_context(|| {
        format!("failed to create capture output file '{}'", args.output.display())
    })?;
    let mut writer = CaptureWriter::new(BufWriter::new(file))?;

    let start = Instant::now();
    let deadline = start + Duration::from_secs(args.duration.max(1));
    let mut buf = vec![0u8; MAX_PACKET_SIZE.max(config.recv_buffer_bytes)];

    while Instant::now() < deadline {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let timeout = remaining.min(Duration::from_millis(250));
        let len = match tokio::time::timeout(timeout, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => len,
            Ok(Err(error)) => return Err(anyhow!("capture receive failed: {error}")),
            Err(_) => continue,
        };
        let timestamp_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        writer.write(timestamp_ns, buf.get(..len).unwrap_or_default())?;
    }

    let packets_captured = writer.records();
    writer.finish()?;

    let summary = CaptureSummary {
        listen: listen.to_string(),
        duration_seconds: args.duration,
        packets_captured,
        output: args.output.display().to_string(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Telemetry capture complete");
        println!("  listen: {}", summary.listen);
        println!("  duration_s: {}", summary.duration_seconds);
        println!("  packets: {}", summary.packets_captured);
        println!("  output: {}", summary.output);
    }
    Ok(())
}
