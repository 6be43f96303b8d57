//! Schema creation and CSV bulk load.

pub mod records;

pub use records::{CsvImport, CsvRecord, MAX_AGE, SkipReason, convert_csv_record, parse_age, read_users};

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::store::{Backend, Store};

/// Outcome of a seed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedReport {
    pub backend: Backend,
    /// Whether the CSV file existed
    pub csv_found: bool,
    /// Rows converted from the CSV
    pub parsed: usize,
    /// Rows dropped during conversion
    pub skipped: usize,
    /// Rows written (duplicates excluded)
    pub inserted: u64,
}

/// Create `user_data` and load `csv_path` into it.
///
/// A missing CSV is not an error: the table is created and the report says
/// `csv_found: false`.
pub async fn seed(store: &Store, csv_path: &Path) -> Result<SeedReport> {
    let repository = store.repository();
    repository.create_schema().await?;

    let mut report = SeedReport {
        backend: store.backend(),
        csv_found: csv_path.exists(),
        parsed: 0,
        skipped: 0,
        inserted: 0,
    };

    if !report.csv_found {
        tracing::info!(
            path = %csv_path.display(),
            backend = %report.backend,
            "CSV file not found, table created only"
        );
        return Ok(report);
    }

    let import = read_users(csv_path)?;
    report.parsed = import.users.len();
    report.skipped = import.skipped;
    report.inserted = repository.insert_many(&import.users).await?;

    tracing::info!(
        backend = %report.backend,
        parsed = report.parsed,
        skipped = report.skipped,
        inserted = report.inserted,
        "Seeded user_data"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_csv_creates_table_only() {
        let store = Store::in_memory();
        let dir = tempfile::tempdir().unwrap();

        let report = seed(&store, &dir.path().join("user_data.csv")).await.unwrap();
        assert!(!report.csv_found);
        assert_eq!(report.inserted, 0);
        assert_eq!(store.repository().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let store = Store::in_memory();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.csv");
        std::fs::write(
            &path,
            "user_id,name,email,age\n\
             a1,Alice,alice@example.com,30\n\
             b2,Bob,bob@example.com,45\n",
        )
        .unwrap();

        let first = seed(&store, &path).await.unwrap();
        assert_eq!(first.backend, Backend::Memory);
        assert_eq!(first.parsed, 2);
        assert_eq!(first.inserted, 2);

        let second = seed(&store, &path).await.unwrap();
        assert_eq!(second.parsed, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(store.repository().count().await.unwrap(), 2);
    }
}
