//! SQL query logging
//!
//! Every statement the SQL repositories and sessions send goes through
//! [`logged`] (or [`log_query`] for streaming queries), so turning on the
//! `prodev::sql` target shows exactly what hits the database and how long it
//! took. Timestamps come from the subscriber.

use std::future::Future;
use std::time::Instant;

/// Tracing target for executed SQL
pub const SQL_TARGET: &str = "prodev::sql";

/// Record that `sql` is about to be executed
pub fn log_query(sql: &str) {
    tracing::info!(target: SQL_TARGET, query = %compact(sql), "Executing SQL query");
}

/// Log `sql`, run `query` and record how long it took
pub async fn logged<F, T>(sql: &str, query: F) -> T
where
    F: Future<Output = T>,
{
    log_query(sql);
    let started = Instant::now();
    let output = query.await;
    tracing::debug!(
        target: SQL_TARGET,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "SQL query finished"
    );
    output
}

/// Collapse the whitespace of multi-line SQL literals onto one line
pub fn compact(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_flattens_multiline_sql() {
        let sql = r#"
            SELECT user_id, name
            FROM user_data
            WHERE age > ?
        "#;
        assert_eq!(compact(sql), "SELECT user_id, name FROM user_data WHERE age > ?");
    }

    #[tokio::test]
    async fn logged_passes_output_through() {
        let value = logged("SELECT 1", async { 41 + 1 }).await;
        assert_eq!(value, 42);
    }
}
