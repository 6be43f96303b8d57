//! Lazy streams over `user_data`.
//!
//! Nothing is queried until a stream is polled, and dropping a stream stops
//! any further queries.

pub mod ages;
pub mod batch;
pub mod page;

pub use ages::{AgeSummary, age_summary, average_age, stream_user_ages};
pub use batch::{batch_processing, stream_users_in_batches};
pub use page::{lazy_pagination, paginate_users};

use futures::stream::BoxStream;
use prodev_core::CoreError;

use crate::user::{User, UserError, UserRepository, UserResult};

/// Batch size used when none is given
pub const DEFAULT_BATCH_SIZE: u64 = 50;

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Every user, one row at a time, from a single query.
pub fn stream_users(repo: &dyn UserRepository) -> BoxStream<'_, UserResult<User>> {
    repo.stream_all()
}

fn invalid_size(err: CoreError) -> UserError {
    UserError::InvalidData(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::InMemoryUserRepository;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn stream_users_yields_rows_in_id_order() {
        let repo = InMemoryUserRepository::with_users(vec![
            User::with_id("b".into(), "B", "b@example.com", 20),
            User::with_id("a".into(), "A", "a@example.com", 30),
        ]);

        let users: Vec<User> = stream_users(&repo).try_collect().await.unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
