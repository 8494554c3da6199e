//! Command implementations for the livetiming CLI

pub mod capture;
pub mod config;
pub mod decode;
pub mod live;
pub mod replay;

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use livetiming_core::{DeltaReference, HighlightMode, PitDeltaOverride, UpdateFrequency};
use livetiming_service::ServiceConfig;

use crate::error::CliError;

#[derive(Args, Debug, Clone, Default)]
pub struct LiveArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// UDP port the game sends to (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Leaderboard refresh rate: 1, 10, 30 or 60
    #[arg(long, value_parser = parse_update_frequency)]
    pub hz: Option<UpdateFrequency>,

    /// Pit stop time loss in seconds instead of the per-track value
    #[arg(long, value_name = "SECONDS")]
    pub pit_delta: Option<f32>,

    /// Which rows to highlight
    #[arg(long, value_enum)]
    pub highlight: Option<HighlightArg>,

    /// Reference car for the delta columns
    #[arg(long, value_enum)]
    pub delta_ref: Option<DeltaRefArg>,

    /// Show every column regardless of the configuration
    #[arg(long)]
    pub all_columns: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<u64>,
}

impl LiveArgs {
    /// Layer the command-line flags over `config`.
    pub fn apply(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.udp_port = port;
        }
        if let Some(hz) = self.hz {
            config.update_frequency = hz;
        }
        if let Some(seconds) = self.pit_delta {
            config.pit_delta_override = PitDeltaOverride::Seconds(seconds);
        }
        if let Some(highlight) = self.highlight {
            config.leaderboard.highlight = highlight.into();
        }
        if let Some(delta_ref) = self.delta_ref {
            config.leaderboard.delta_reference = delta_ref.into();
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightArg {
    Off,
    OnlyMe,
    Everyone,
}

impl From<HighlightArg> for HighlightMode {
    fn from(arg: HighlightArg) -> Self {
        match arg {
            HighlightArg::Off => HighlightMode::Off,
            HighlightArg::OnlyMe => HighlightMode::OnlyMe,
            HighlightArg::Everyone => HighlightMode::Everyone,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaRefArg {
    Leader,
    CarAhead,
}

impl From<DeltaRefArg> for DeltaReference {
    fn from(arg: DeltaRefArg) -> Self {
        match arg {
            DeltaRefArg::Leader => DeltaReference::Leader,
            DeltaRefArg::CarAhead => DeltaReference::CarAhead,
        }
    }
}

fn parse_update_frequency(value: &str) -> Result<UpdateFrequency, String> {
    let hz: u32 = value.parse().map_err(|e| format!("{e}"))?;
    UpdateFrequency::from_hz(hz).map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone)]
pub struct CaptureArgs {
    /// Output capture file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// UDP port the game sends to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Capture duration in seconds
    #[arg(long, default_value_t = 60)]
    pub duration: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Capture file to replay
    pub file: PathBuf,

    /// Pit stop time loss in seconds instead of the per-track value
    #[arg(long, value_name = "SECONDS")]
    pub pit_delta: Option<f32>,

    /// Which rows to highlight
    #[arg(long, value_enum)]
    pub highlight: Option<HighlightArg>,

    /// Reference car for the delta columns
    #[arg(long, value_enum)]
    pub delta_ref: Option<DeltaRefArg>,

    /// Show every column regardless of the configuration
    #[arg(long)]
    pub all_columns: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Capture file to list
    pub file: PathBuf,

    /// Only show the first N datagrams
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration as JSON
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write the file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Configuration from `path` (or defaults) with environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let config = match path {
        Some(path) => ServiceConfig::load(path).map_err(CliError::from)?,
        None => ServiceConfig::default(),
    };
    Ok(config.with_env_overrides())
}
