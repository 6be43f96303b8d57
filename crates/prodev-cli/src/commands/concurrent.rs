//! Concurrent command handler

use prodev::ProdevConfig;
use std::io::Write;

use super::print_json_line;
use crate::error::CliError;

pub async fn run_concurrent<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
    older_than: u32,
) -> Result<(), CliError> {
    let (_, service) = super::connect(config).await?;

    let fetched = service.fetch_concurrently(older_than).await?;

    writeln!(out, "# all users: {}", fetched.all_users.len())?;
    writeln!(
        out,
        "# users older than {}: {}",
        older_than,
        fetched.older_users.len()
    )?;
    for user in &fetched.older_users {
        print_json_line(out, user)?;
    }
    out.flush()?;

    Ok(())
}
