//! Batch command handler

use futures::TryStreamExt;
use prodev::{OlderThan, ProdevConfig, UserFilter};
use std::io::Write;

use super::print_json_line;
use crate::error::CliError;

pub async fn run_batch<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
    batch_size: u64,
    older_than: u32,
) -> Result<(), CliError> {
    let (_, service) = super::connect(config).await?;

    let filter = OlderThan(older_than);
    if let Some(name) = filter.metadata().name {
        tracing::info!(batch_size, filter = %name, "Processing users in batches");
    }

    let mut users = service.batch_processing(batch_size, filter);
    let mut kept = 0usize;
    while let Some(user) = users.try_next().await? {
        print_json_line(out, &user)?;
        kept += 1;
    }
    out.flush()?;

    tracing::info!(kept, "Batch processing finished");
    Ok(())
}
