//! The `user_data` row

use serde::{Deserialize, Serialize};

use crate::types::{USER_ID_MAX_LEN, UserId};
use crate::{CoreError, Result};

/// One row of the `user_data` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl User {
    /// Create a user with a freshly generated id
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            user_id: UserId::new(),
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Create a user with a known id
    pub fn with_id(
        user_id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        age: u32,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Check the row can be stored as-is.
    pub fn validate(&self) -> Result<()> {
        let id = self.user_id.as_str();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidRecord("user_id cannot be empty".to_string()));
        }
        if id.chars().count() > USER_ID_MAX_LEN {
            return Err(CoreError::InvalidRecord(format!(
                "user_id '{}' is longer than {} characters",
                id, USER_ID_MAX_LEN
            )));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidRecord(format!(
                "user {} has an empty name",
                id
            )));
        }
        if self.email.trim().is_empty() {
            return Err(CoreError::InvalidRecord(format!(
                "user {} has an empty email",
                id
            )));
        }
        Ok(())
    }
}
