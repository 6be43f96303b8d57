//! Error types for prodev crate

use std::path::PathBuf;
use thiserror::Error;

use crate::user::UserError;

#[derive(Error, Debug)]
pub enum ProdevError {
    #[error("Core error: {0}")]
    Core(#[from] prodev_core::CoreError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    #[error("CSV file not found: {}", .0.display())]
    CsvNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProdevError {
    pub(crate) fn connection(backend: &str, message: impl std::fmt::Display) -> Self {
        Self::Connection {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProdevError>;
