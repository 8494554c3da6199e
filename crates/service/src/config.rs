//! Service configuration.
//!
//! Stored as JSON. Two environment variables override the file:
//! `LIVETIMING_UDP_PORT` and `LIVETIMING_UPDATE_HZ`.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use livetiming_core::{
    ColumnVisibility, LeaderboardOptions, PitDeltaOverride, UpdateFrequency,
};
use livetiming_telemetry_f1::MAX_PACKET_SIZE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};

/// Port the game broadcasts to by default.
pub const DEFAULT_UDP_PORT: u16 = 20777;
pub const ENV_UDP_PORT: &str = "LIVETIMING_UDP_PORT";
pub const ENV_UPDATE_HZ: &str = "LIVETIMING_UPDATE_HZ";

const DEFAULT_RECV_BUFFER_BYTES: usize = 2048;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: IpAddr,
    /// 0 lets the OS pick a port.
    pub udp_port: u16,
    pub update_frequency: UpdateFrequency,
    pub pit_delta_override: PitDeltaOverride,
    pub leaderboard: LeaderboardOptions,
    pub columns: ColumnVisibility,
    /// Plain leaderboard text with no colours.
    pub performance_mode: bool,
    /// Receive buffer; longer datagrams are cut and then fail to decode.
    pub recv_buffer_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            udp_port: DEFAULT_UDP_PORT,
            update_frequency: UpdateFrequency::default(),
            pit_delta_override: PitDeltaOverride::default(),
            leaderboard: LeaderboardOptions::default(),
            columns: ColumnVisibility::default(),
            performance_mode: false,
            recv_buffer_bytes: DEFAULT_RECV_BUFFER_BYTES,
        }
    }
}

impl ServiceConfig {
    /// # Errors
    ///
    /// [`ServiceError::Options`] for a bad pit delta override,
    /// [`ServiceError::InvalidConfig`] for a receive buffer smaller than the
    /// largest packet.
    pub fn validate(&self) -> ServiceResult<()> {
        self.pit_delta_override.validate()?;
        if self.recv_buffer_bytes < MAX_PACKET_SIZE {
            return Err(ServiceError::invalid_config(format!(
                "recv_buffer_bytes must be at least {MAX_PACKET_SIZE}, got {}",
                self.recv_buffer_bytes
            )));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.udp_port)
    }

    #[must_use]
    pub fn with_bind_address(mut self, bind_address: IpAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    #[must_use]
    pub fn with_udp_port(mut self, udp_port: u16) -> Self {
        self.udp_port = udp_port;
        self
    }

    #[must_use]
    pub fn with_update_frequency(mut self, update_frequency: UpdateFrequency) -> Self {
        self.update_frequency = update_frequency;
        self
    }

    #[must_use]
    pub fn with_pit_delta_override(mut self, pit_delta_override: PitDeltaOverride) -> Self {
        self.pit_delta_override = pit_delta_override;
        self
    }

    #[must_use]
    pub fn with_leaderboard(mut self, leaderboard: LeaderboardOptions) -> Self {
        self.leaderboard = leaderboard;
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnVisibility) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_performance_mode(mut self, performance_mode: bool) -> Self {
        self.performance_mode = performance_mode;
        self
    }

    /// Read a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ConfigIo`] when the file cannot be read,
    /// [`ServiceError::ConfigParse`] when it is not valid JSON for this type.
    pub fn load(path: &Path) -> ServiceResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ServiceError::config_io(path, e))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ServiceError::config_parse(path, e))?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write the config as pretty JSON.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ConfigIo`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> ServiceResult<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| ServiceError::config_parse(path, e))?;
        fs::write(path, text).map_err(|e| ServiceError::config_io(path, e))
    }

    /// Apply `LIVETIMING_UDP_PORT` and `LIVETIMING_UPDATE_HZ` from the
    /// process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`. Unparseable or unsupported
    /// values are ignored with a warning.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.udp_port = env_u16(&lookup, ENV_UDP_PORT, self.udp_port);
        if let Some(hz) = lookup(ENV_UPDATE_HZ) {
            match hz.trim().parse::<u32>().map(UpdateFrequency::from_hz) {
                Ok(Ok(frequency)) => self.update_frequency = frequency,
                _ => warn!(
                    value = %hz,
                    var = ENV_UPDATE_HZ,
                    "ignoring unsupported update frequency"
                ),
            }
        }
        self
    }
}

// ── Env helpers ───────────────────────────────────────────────────────────────

fn env_u16(lookup: &impl Fn(&str) -> Option<String>, name: &str, fallback: u16) -> u16 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}
