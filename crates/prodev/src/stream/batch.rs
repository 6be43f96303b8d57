use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use prodev_core::{PageRequest, UserFilter};

use super::invalid_size;
use crate::user::{User, UserError, UserRepository, UserResult};

enum BatchState {
    /// Table size not known yet
    Start(PageRequest),
    Window { request: PageRequest, total: u64 },
}

async fn next_batch(
    repo: &dyn UserRepository,
    state: BatchState,
) -> UserResult<Option<(Vec<User>, BatchState)>> {
    let (request, total) = match state {
        BatchState::Start(request) => (request, repo.count().await?),
        BatchState::Window { request, total } => (request, total),
    };

    if request.offset() >= total {
        return Ok(None);
    }

    let users = repo.fetch_page(request.limit(), request.offset()).await?;
    if users.is_empty() {
        // Rows deleted since the count
        return Ok(None);
    }

    tracing::debug!(
        offset = request.offset(),
        rows = users.len(),
        total,
        "Fetched batch"
    );
    Ok(Some((
        users,
        BatchState::Window {
            request: request.next(),
            total,
        },
    )))
}

/// Users in windows of `batch_size`.
///
/// Counts the table on first poll, then reads `LIMIT batch_size OFFSET n`
/// windows until the count is reached. A `batch_size` of zero yields a single
/// [`UserError::InvalidData`].
pub fn stream_users_in_batches(
    repo: &dyn UserRepository,
    batch_size: u64,
) -> BoxStream<'_, UserResult<Vec<User>>> {
    match PageRequest::new(batch_size) {
        Ok(request) => stream::try_unfold(BatchState::Start(request), move |state| {
            next_batch(repo, state)
        })
        .boxed(),
        Err(e) => stream::once(async move { Err::<Vec<User>, _>(invalid_size(e)) }).boxed(),
    }
}

/// Users from every batch that `filter` accepts, in id order.
pub fn batch_processing<'a, F>(
    repo: &'a dyn UserRepository,
    batch_size: u64,
    filter: F,
) -> BoxStream<'a, UserResult<User>>
where
    F: UserFilter + 'a,
{
    stream_users_in_batches(repo, batch_size)
        .map_ok(move |batch| {
            let fetched = batch.len();
            let kept: Vec<User> = batch.into_iter().filter(|u| filter.accepts(u)).collect();
            tracing::debug!(fetched, kept = kept.len(), "Processed batch");
            stream::iter(kept.into_iter().map(Ok::<User, UserError>))
        })
        .try_flatten()
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::InMemoryUserRepository;
    use prodev_core::{AcceptAll, OlderThan};

    fn repo_with(n: u32) -> InMemoryUserRepository {
        InMemoryUserRepository::with_users((0..n).map(|i| {
            User::with_id(
                format!("user-{:03}", i).into(),
                format!("User {}", i),
                format!("user{}@example.com", i),
                20 + i,
            )
        }))
    }

    #[tokio::test]
    async fn batches_cover_the_table() {
        let repo = repo_with(7);
        let batches: Vec<Vec<User>> = stream_users_in_batches(&repo, 3)
            .try_collect()
            .await
            .unwrap();

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(batches[2][0].user_id.as_str(), "user-006");
    }

    #[tokio::test]
    async fn empty_table_yields_nothing() {
        let repo = InMemoryUserRepository::new();
        let batches: Vec<Vec<User>> = stream_users_in_batches(&repo, 10)
            .try_collect()
            .await
            .unwrap();
        assert!(batches.is_empty());
    }

    #[tokio::test]
    async fn zero_batch_size_is_an_error() {
        let repo = repo_with(2);
        let items: Vec<_> = stream_users_in_batches(&repo, 0).collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(UserError::InvalidData(_))));
    }

    #[tokio::test]
    async fn batch_processing_keeps_users_over_25() {
        // ages 20..=29
        let repo = repo_with(10);
        let users: Vec<User> = batch_processing(&repo, 4, OlderThan::default())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(users.len(), 4);
        assert!(users.iter().all(|u| u.age > 25));
        assert_eq!(users[0].age, 26);
    }

    #[tokio::test]
    async fn batch_processing_with_accept_all() {
        let repo = repo_with(5);
        let users: Vec<User> = batch_processing(&repo, 2, AcceptAll)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(users.len(), 5);
    }
}
