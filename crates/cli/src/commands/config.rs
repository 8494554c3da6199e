//! Configuration file commands.

use std::io;

use anyhow::Result;
use colored::*;
use livetiming_service::ServiceConfig;

use crate::commands::ConfigCommands;
use crate::error::CliError;

/// Execute a config command.
pub fn execute(cmd: &ConfigCommands, config: &ServiceConfig, json: bool) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let text = if json {
                serde_json::to_string(config)?
            } else {
                serde_json::to_string_pretty(config)?
            };
            println!("{text}");
            Ok(())
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                return Err(CliError::IoError(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists (use --force to overwrite)", path.display()),
                ))
                .into());
            }
            ServiceConfig::default()
                .save(path)
                .map_err(CliError::from)?;
            if !json {
                println!("{} {}", "Wrote".green(), path.display());
            }
            Ok(())
        }
    }
}
