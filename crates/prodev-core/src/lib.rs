//! # prodev core
//!
//! Backend-free types shared by the prodev storage layer and CLI: the
//! `user_data` row, offset pagination windows and row filters.

pub mod error;
pub mod filter;
pub mod page;
pub mod types;
pub mod user;

pub use error::{CoreError, Result};
pub use filter::{
    AcceptAll, BoxedFilter, ChainedFilter, FilterExt, FilterMetadata, FnFilter, OlderThan,
    SharedFilter, UserFilter, filter_fn,
};
pub use page::{Page, PageRequest};
pub use types::{USER_ID_MAX_LEN, UserId};
pub use user::User;
