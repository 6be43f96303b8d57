use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{User, UserError, UserId, UserRepository, UserResult};
use crate::store::Backend;

/// In-memory implementation of UserRepository for testing and dry runs.
///
/// Rows are kept in a `BTreeMap` keyed by id, which gives the same ordering the
/// SQL backends use (`ORDER BY user_id`).
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
        }
    }

    /// Start with the given rows; later duplicates of an id are dropped
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut map = BTreeMap::new();
        for user in users {
            map.entry(user.user_id.clone()).or_insert(user);
        }
        Self {
            users: RwLock::new(map),
        }
    }

    fn read(&self) -> UserResult<RwLockReadGuard<'_, BTreeMap<UserId, User>>> {
        self.users.read().map_err(|e| {
            UserError::RepositoryError(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> UserResult<RwLockWriteGuard<'_, BTreeMap<UserId, User>>> {
        self.users.write().map_err(|e| {
            UserError::RepositoryError(format!("Failed to acquire write lock: {}", e))
        })
    }

    fn snapshot(&self) -> UserResult<Vec<User>> {
        Ok(self.read()?.values().cloned().collect())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn create_schema(&self) -> UserResult<()> {
        Ok(())
    }

    async fn insert_many(&self, users: &[User]) -> UserResult<u64> {
        let mut map = self.write()?;
        let mut inserted = 0;
        for user in users {
            if !map.contains_key(&user.user_id) {
                map.insert(user.user_id.clone(), user.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn create(&self, user: User) -> UserResult<User> {
        let mut map = self.write()?;

        if map.contains_key(&user.user_id) {
            return Err(UserError::AlreadyExists(user.user_id.to_string()));
        }

        map.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    async fn get(&self, id: &UserId) -> UserResult<User> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn count(&self) -> UserResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        self.snapshot()
    }

    async fn list_older_than(&self, age: u32) -> UserResult<Vec<User>> {
        Ok(self
            .read()?
            .values()
            .filter(|user| user.age > age)
            .cloned()
            .collect())
    }

    async fn fetch_page(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .read()?
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    fn stream_all(&self) -> BoxStream<'_, UserResult<User>> {
        // Snapshot on first poll, not when the stream is built
        stream::once(async move { self.snapshot() })
            .map_ok(|users| stream::iter(users.into_iter().map(Ok::<User, UserError>)))
            .try_flatten()
            .boxed()
    }

    fn stream_ages(&self) -> BoxStream<'_, UserResult<u32>> {
        self.stream_all()
            .map(|user| user.map(|u| u.age))
            .boxed()
    }
}
