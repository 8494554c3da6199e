//! Error types for the livetiming CLI

use livetiming_service::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid capture file: {0}")]
    InvalidCapture(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_) => 2,
            Self::Service(err) if err.is_config_error() => 2,
            _ => 1,
        }
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
