//! Stream command handler

use futures::{StreamExt, TryStreamExt};
use prodev::ProdevConfig;
use std::io::Write;

use super::print_json_line;
use crate::error::CliError;

/// Print users one JSON line at a time, stopping after `limit` rows.
pub async fn run_stream<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
    limit: Option<usize>,
) -> Result<(), CliError> {
    let (_, service) = super::connect(config).await?;

    let users = service.stream_users();
    let mut users = match limit {
        Some(limit) => users.take(limit).boxed(),
        None => users,
    };

    while let Some(user) = users.try_next().await? {
        print_json_line(out, &user)?;
    }
    out.flush()?;

    Ok(())
}
