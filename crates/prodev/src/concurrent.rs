//! Independent reads issued at the same time.

use serde::Serialize;

use crate::user::{User, UserRepository, UserResult};

/// Age threshold for the second query when none is given
pub const DEFAULT_OLDER_THAN: u32 = 40;

/// Results of [`fetch_concurrently`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConcurrentFetch {
    pub all_users: Vec<User>,
    pub older_users: Vec<User>,
}

/// Run "all users" and "users older than `older_than`" concurrently.
///
/// Fails as soon as either query fails.
pub async fn fetch_concurrently(
    repo: &dyn UserRepository,
    older_than: u32,
) -> UserResult<ConcurrentFetch> {
    let (all_users, older_users) = tokio::try_join!(repo.list(), repo.list_older_than(older_than))?;

    tracing::debug!(
        all = all_users.len(),
        older = older_users.len(),
        older_than,
        "Concurrent fetch finished"
    );
    Ok(ConcurrentFetch {
        all_users,
        older_users,
    })
}
