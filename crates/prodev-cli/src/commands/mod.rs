//! CLI command handlers

pub mod average_age;
pub mod batch;
pub mod concurrent;
pub mod paginate;
pub mod query;
pub mod seed;
pub mod stream;

pub use average_age::run_average_age;
pub use batch::run_batch;
pub use concurrent::run_concurrent;
pub use paginate::run_paginate;
pub use query::run_query;
pub use seed::run_seed;
pub use stream::run_stream;

use prodev::{ProdevConfig, RetryConfig, Store, UserService};
use serde::Serialize;
use std::io::Write;

use crate::error::CliError;

/// Connect to the configured backend and wrap it in a service
pub async fn connect(config: &ProdevConfig) -> Result<(Store, UserService), CliError> {
    let store = Store::connect(&config.database, config.backend).await?;
    let service =
        UserService::with_retry_config(store.repository(), RetryConfig::from(&config.retry));
    Ok((store, service))
}

/// Write `value` as one line of JSON
pub fn print_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
