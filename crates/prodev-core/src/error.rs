//! Error types for prodev-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(u64),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
