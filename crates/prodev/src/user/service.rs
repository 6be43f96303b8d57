use futures::stream::BoxStream;
use prodev_core::{Page, UserFilter};
use std::sync::Arc;

use super::{User, UserError, UserId, UserRepository, UserResult};
use crate::concurrent::{self, ConcurrentFetch};
use crate::retry::{RetryConfig, with_retry};
use crate::stream::{self, AgeSummary};

/// Service layer for user_data operations.
///
/// Reads that complete as a unit (counts, lists, single pages, aggregates) are
/// retried on operational failures. Streams are not: a stream that fails
/// half way is surfaced to the caller as an error item.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    retry: RetryConfig,
}

impl UserService {
    /// Create a new UserService with the default retry policy
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self::with_retry_config(repository, RetryConfig::default())
    }

    pub fn with_retry_config(repository: Arc<dyn UserRepository>, retry: RetryConfig) -> Self {
        Self { repository, retry }
    }

    pub fn repository(&self) -> &dyn UserRepository {
        self.repository.as_ref()
    }

    /// Create `user_data` if missing
    pub async fn create_schema(&self) -> UserResult<()> {
        self.repository.create_schema().await
    }

    /// Register a new user with a generated id
    pub async fn register_user(
        &self,
        name: String,
        email: String,
        age: u32,
    ) -> UserResult<User> {
        let user = User::new(name.trim(), email.trim(), age);
        user.validate()?;

        match self.repository.get(&user.user_id).await {
            Ok(_) => return Err(UserError::AlreadyExists(user.user_id.to_string())),
            Err(UserError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        self.repository.create(user).await
    }

    /// Bulk insert, skipping invalid rows and existing ids.
    ///
    /// Returns the number of rows written.
    pub async fn import(&self, users: Vec<User>) -> UserResult<u64> {
        let (valid, invalid): (Vec<User>, Vec<User>) =
            users.into_iter().partition(|u| u.validate().is_ok());
        if !invalid.is_empty() {
            tracing::warn!(skipped = invalid.len(), "Skipping invalid users on import");
        }
        self.repository.insert_many(&valid).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &UserId) -> UserResult<User> {
        self.repository.get(id).await
    }

    pub async fn count(&self) -> UserResult<u64> {
        with_retry(&self.retry, "count", || self.repository.count()).await
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        with_retry(&self.retry, "list_users", || self.repository.list()).await
    }

    pub fn stream_users(&self) -> BoxStream<'_, UserResult<User>> {
        stream::stream_users(self.repository())
    }

    pub fn stream_users_in_batches(&self, batch_size: u64) -> BoxStream<'_, UserResult<Vec<User>>> {
        stream::stream_users_in_batches(self.repository(), batch_size)
    }

    pub fn batch_processing<'a, F>(
        &'a self,
        batch_size: u64,
        filter: F,
    ) -> BoxStream<'a, UserResult<User>>
    where
        F: UserFilter + 'a,
    {
        stream::batch_processing(self.repository(), batch_size, filter)
    }

    pub async fn paginate_users(&self, page_size: u64, offset: u64) -> UserResult<Page> {
        with_retry(&self.retry, "paginate_users", || {
            stream::paginate_users(self.repository(), page_size, offset)
        })
        .await
    }

    pub fn lazy_pagination(&self, page_size: u64) -> BoxStream<'_, UserResult<Page>> {
        stream::lazy_pagination(self.repository(), page_size)
    }

    pub fn stream_user_ages(&self) -> BoxStream<'_, UserResult<u32>> {
        stream::stream_user_ages(self.repository())
    }

    pub async fn age_summary(&self) -> UserResult<AgeSummary> {
        with_retry(&self.retry, "age_summary", || {
            stream::age_summary(self.repository())
        })
        .await
    }

    /// Average age, `None` for an empty table
    pub async fn average_age(&self) -> UserResult<Option<f64>> {
        Ok(self.age_summary().await?.average())
    }

    /// All users and users older than `older_than`, fetched concurrently
    pub async fn fetch_concurrently(&self, older_than: u32) -> UserResult<ConcurrentFetch> {
        with_retry(&self.retry, "fetch_concurrently", || {
            concurrent::fetch_concurrently(self.repository(), older_than)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::InMemoryUserRepository;
    use futures::TryStreamExt;
    use prodev_core::OlderThan;

    fn service() -> UserService {
        UserService::with_retry_config(
            Arc::new(InMemoryUserRepository::new()),
            RetryConfig::disabled(),
        )
    }

    #[tokio::test]
    async fn register_and_get() {
        let service = service();
        let user = service
            .register_user(" Alice ".to_string(), "alice@example.com".to_string(), 30)
            .await
            .unwrap();

        assert_eq!(user.name, "Alice");
        let found = service.get_user(&user.user_id).await.unwrap();
        assert_eq!(found, user);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn register_rejects_blank_name() {
        let service = service();
        let err = service
            .register_user("  ".to_string(), "a@example.com".to_string(), 30)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Core(_)));
    }

    #[tokio::test]
    async fn import_skips_invalid_and_duplicates() {
        let service = service();
        let alice = User::with_id("a".into(), "Alice", "alice@example.com", 30);
        let blank = User::with_id("b".into(), "", "b@example.com", 30);

        let inserted = service
            .import(vec![alice.clone(), blank, alice])
            .await
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stream_operations_delegate() {
        let service = service();
        service
            .import(vec![
                User::with_id("1".into(), "A", "a@example.com", 20),
                User::with_id("2".into(), "B", "b@example.com", 50),
            ])
            .await
            .unwrap();

        let older: Vec<User> = service
            .batch_processing(1, OlderThan::default())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(older.len(), 1);

        let pages: Vec<Page> = service.lazy_pagination(1).try_collect().await.unwrap();
        assert_eq!(pages.len(), 2);

        assert_eq!(service.average_age().await.unwrap(), Some(35.0));
        let fetched = service.fetch_concurrently(40).await.unwrap();
        assert_eq!(fetched.older_users.len(), 1);
    }
}
