//! Error types for prodev-cli

use prodev::{ProdevError, UserError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Prodev(#[from] ProdevError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
