//! CSV records for the `user_data` seed file.

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;

use crate::error::{ProdevError, Result};
use prodev_core::{USER_ID_MAX_LEN, User, UserId};

/// Largest age a `DECIMAL(5,0)` column holds
pub const MAX_AGE: u32 = 99_999;

/// One raw line of the seed file. Columns are matched by header name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
}

/// Why a record was not converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingField(&'static str),
    InvalidAge(String),
    IdTooLong(usize),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing {}", field),
            SkipReason::InvalidAge(raw) => write!(f, "invalid age '{}'", raw),
            SkipReason::IdTooLong(len) => {
                write!(f, "user_id has {} characters (max {})", len, USER_ID_MAX_LEN)
            }
        }
    }
}

/// Users parsed from a seed file
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub users: Vec<User>,
    pub skipped: usize,
}

fn required(value: Option<String>, field: &'static str) -> std::result::Result<String, SkipReason> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(SkipReason::MissingField(field))
}

/// Parse an age such as `42`, `42.0` or `42.9` (truncated to 42).
pub fn parse_age(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let age = value.trunc();
    if age > f64::from(MAX_AGE) {
        return None;
    }
    Some(age as u32)
}

/// Convert a raw record into a [`User`], generating an id when none is given.
pub fn convert_csv_record(record: CsvRecord) -> std::result::Result<User, SkipReason> {
    let name = required(record.name, "name")?;
    let email = required(record.email, "email")?;
    let age_raw = required(record.age, "age")?;
    let age = parse_age(&age_raw).ok_or(SkipReason::InvalidAge(age_raw))?;

    let user_id = match record.user_id.map(|id| id.trim().to_string()) {
        Some(id) if !id.is_empty() => {
            let len = id.chars().count();
            if len > USER_ID_MAX_LEN {
                return Err(SkipReason::IdTooLong(len));
            }
            UserId::from_string(id)
        }
        _ => UserId::new(),
    };

    Ok(User::with_id(user_id, name, email, age))
}

/// Read every usable row of the seed file.
///
/// Rows that cannot be converted are counted in [`CsvImport::skipped`] and
/// logged at `debug`; malformed CSV is an error.
pub fn read_users(path: &Path) -> Result<CsvImport> {
    if !path.exists() {
        return Err(ProdevError::CsvNotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut import = CsvImport::default();
    for (index, record) in reader.deserialize::<CsvRecord>().enumerate() {
        let record = record?;
        match convert_csv_record(record) {
            Ok(user) => import.users.push(user),
            Err(reason) => {
                // +2: one for the header, one for 1-based line numbers
                tracing::debug!(line = index + 2, "Skipping CSV row: {}", reason);
                import.skipped += 1;
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        parsed = import.users.len(),
        skipped = import.skipped,
        "Read seed file"
    );
    Ok(import)
}
