use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{User, UserId, UserResult};
use crate::store::Backend;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Which backend serves this repository
    fn backend(&self) -> Backend;

    /// Create the `user_data` table if it does not exist
    async fn create_schema(&self) -> UserResult<()>;

    /// Insert many users in one transaction, skipping ids that already exist.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_many(&self, users: &[User]) -> UserResult<u64>;

    /// Insert a single user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get(&self, id: &UserId) -> UserResult<User>;

    /// Number of rows in the table
    async fn count(&self) -> UserResult<u64>;

    /// All users, ordered by id
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Users strictly older than `age`, ordered by id
    async fn list_older_than(&self, age: u32) -> UserResult<Vec<User>>;

    /// One `LIMIT`/`OFFSET` window, ordered by id
    async fn fetch_page(&self, limit: u64, offset: u64) -> UserResult<Vec<User>>;

    /// Every user, one row at a time
    fn stream_all(&self) -> BoxStream<'_, UserResult<User>>;

    /// Every user's age, one row at a time
    fn stream_ages(&self) -> BoxStream<'_, UserResult<u32>>;
}
