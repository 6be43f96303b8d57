//! Query command handler

use prodev::{ExecuteQuery, RetryConfig, SqlParam, with_retry};
use std::io::Write;
use std::path::PathBuf;

use super::print_json_line;
use crate::error::CliError;

/// Run one query in its own SQLite session, retrying operational failures.
pub async fn run_query<W: Write>(
    out: &mut W,
    db: PathBuf,
    sql: String,
    params: Vec<SqlParam>,
    retry: &RetryConfig,
) -> Result<(), CliError> {
    if sql.trim().is_empty() {
        return Err(CliError::InvalidInput("SQL cannot be empty".to_string()));
    }

    let shown: Vec<String> = params.iter().map(ToString::to_string).collect();
    tracing::info!(db = %db.display(), params = %shown.join(", "), "Running query");
    let query = ExecuteQuery::new(db, sql).params(params);
    let users = with_retry(retry, "query", || query.run()).await?;

    for user in &users {
        print_json_line(out, user)?;
    }
    out.flush()?;

    Ok(())
}
