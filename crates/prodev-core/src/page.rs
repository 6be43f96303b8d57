//! Offset pagination over `LIMIT ? OFFSET ?` windows

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result, User};

/// A `LIMIT`/`OFFSET` window.
///
/// The limit is never zero: a zero-sized window would never advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u64,
    offset: u64,
}

impl PageRequest {
    /// First window of `size` rows.
    pub fn new(size: u64) -> Result<Self> {
        Self::at(size, 0)
    }

    /// Window of `size` rows starting at `offset`.
    pub fn at(size: u64, offset: u64) -> Result<Self> {
        if size == 0 {
            return Err(CoreError::InvalidPageSize(size));
        }
        Ok(Self {
            limit: size,
            offset,
        })
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Get OFFSET value.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The window right after this one.
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// 1-based page number; offsets that are not a multiple of the limit
    /// round down.
    pub fn page_number(&self) -> u64 {
        self.offset / self.limit + 1
    }
}

/// One page of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u64,
    /// Offset of the first row
    pub offset: u64,
    /// Requested page size
    pub limit: u64,
    /// Rows on this page
    pub users: Vec<User>,
}

impl Page {
    pub fn new(request: PageRequest, users: Vec<User>) -> Self {
        Self {
            number: request.page_number(),
            offset: request.offset(),
            limit: request.limit(),
            users,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// A short page means the table ends here.
    pub fn is_last(&self) -> bool {
        (self.users.len() as u64) < self.limit
    }
}
