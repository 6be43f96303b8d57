//! prodev CLI library

pub mod commands;
pub mod error;
pub mod logging;

use prodev::{BackendPreference, ProdevConfig};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Resolve the effective configuration.
///
/// Order: defaults, then the JSON file (if any), then `.env` and the `DB_*`
/// variables, then explicit command-line options.
pub fn resolve_config(
    config_file: Option<&Path>,
    backend: Option<BackendPreference>,
    sqlite_path: Option<PathBuf>,
) -> Result<ProdevConfig, CliError> {
    let config = match config_file {
        Some(path) => ProdevConfig::load_from_file(path)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?,
        None => ProdevConfig::default(),
    };

    let mut config = config
        .apply_env()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    if let Some(backend) = backend {
        config.backend = backend;
    }
    if let Some(path) = sqlite_path {
        config.database.sqlite_path = path;
    }

    Ok(config)
}

/// Log level to start with: the `--log-level` flag, else the configured one.
pub fn effective_log_level<'a>(flag: Option<&'a str>, config: &'a ProdevConfig) -> &'a str {
    flag.unwrap_or(&config.log_level)
}
