//! Main crate for prodev
//!
//! Seeds the `ALX_prodev.user_data` table from CSV (MySQL, falling back to a
//! SQLite file) and reads it back through lazy streams: row by row, in
//! batches, page by page, or as a single-pass aggregate.

pub mod concurrent;
pub mod config;
pub mod error;
pub mod query_log;
pub mod retry;
pub mod seed;
pub mod session;
pub mod store;
pub mod stream;
pub mod user;

// Re-export core types
pub use prodev_core::{
    AcceptAll, CoreError, FilterExt, OlderThan, Page, PageRequest, User, UserFilter, UserId,
    filter_fn,
};

pub use concurrent::{ConcurrentFetch, fetch_concurrently};
pub use config::{DatabaseConfig, ProdevConfig, RetrySettings};
pub use error::{ProdevError, Result as ProdevResult};
pub use retry::{RetryConfig, with_retry};
pub use seed::{CsvImport, SeedReport, read_users, seed};
pub use session::{DatabaseSession, ExecuteQuery, SqlParam, with_session};
pub use store::{Backend, BackendPreference, Store};
pub use stream::{
    AgeSummary, age_summary, average_age, batch_processing, lazy_pagination, paginate_users,
    stream_user_ages, stream_users, stream_users_in_batches,
};
pub use user::{UserError, UserRepository, UserResult, UserService};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::store::{Backend, Store};
    pub use crate::user::{UserRepository, UserService};
    pub use futures::{StreamExt, TryStreamExt};
    pub use prodev_core::{FilterExt, OlderThan, Page, User, UserFilter};
}
