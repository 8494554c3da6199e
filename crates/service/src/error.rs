//! Errors surfaced by the live timing service.
//!
//! Only startup and configuration fail; everything that goes wrong per
//! datagram is logged, counted and dropped by the receiver.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use livetiming_core::OptionsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("failed to access configuration file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

impl ServiceError {
    #[must_use]
    pub fn bind(addr: SocketAddr, source: io::Error) -> Self {
        Self::Bind { addr, source }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    #[must_use]
    pub fn config_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// The configuration was rejected, as opposed to a runtime failure.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::Options(_) | Self::ConfigParse { .. }
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
