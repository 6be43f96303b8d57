//! Paginate command handler

use futures::{StreamExt, TryStreamExt};
use prodev::ProdevConfig;
use std::io::Write;

use super::print_json_line;
use crate::error::CliError;

/// Walk the table page by page, printing a header before each page.
pub async fn run_paginate<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
    page_size: u64,
    max_pages: Option<usize>,
) -> Result<(), CliError> {
    let (_, service) = super::connect(config).await?;

    let pages = service.lazy_pagination(page_size);
    let mut pages = match max_pages {
        Some(max) => pages.take(max).boxed(),
        None => pages,
    };

    while let Some(page) = pages.try_next().await? {
        writeln!(
            out,
            "# page {} (offset {}, {} rows)",
            page.number,
            page.offset,
            page.len()
        )?;
        for user in &page.users {
            print_json_line(out, user)?;
        }
    }
    out.flush()?;

    Ok(())
}
