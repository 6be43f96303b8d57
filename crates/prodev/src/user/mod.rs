pub mod error;
pub mod in_memory_repository;
pub mod mysql_repository;
pub mod repository;
pub mod service;
pub mod sqlite_repository;

pub use error::{UserError, UserResult};
pub use in_memory_repository::InMemoryUserRepository;
pub use mysql_repository::MySqlUserRepository;
pub use prodev_core::{User, UserId};
pub use repository::UserRepository;
pub use service::UserService;
pub use sqlite_repository::SqliteUserRepository;

/// Rows per multi-row INSERT; four binds per row stays under SQLite's
/// default limit of 999 host parameters.
pub(crate) const INSERT_CHUNK_SIZE: usize = 200;

/// Convert a stored age into the domain type
pub(crate) fn age_from_column(age: i64) -> UserResult<u32> {
    u32::try_from(age).map_err(|_| UserError::InvalidData(format!("Age out of range: {}", age)))
}

/// LIMIT/OFFSET values are bound as signed 64-bit integers
pub(crate) fn bind_value(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
