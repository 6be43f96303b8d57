//! Row filters applied during batch processing
//!
//! A filter decides, row by row, whether a user survives a batch. Filters are
//! plain predicates so they can run inside any stream combinator, and they
//! compose with [`FilterExt::and`].

use crate::User;
use std::sync::Arc;

/// Predicate over users
pub trait UserFilter: Send + Sync {
    /// Whether `user` should be kept
    fn accepts(&self, user: &User) -> bool;

    /// Optional method to describe the filter
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::default()
    }
}

/// Metadata about a filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMetadata {
    /// Human-readable name of the filter
    pub name: Option<String>,
    /// Description of what this filter keeps
    pub description: Option<String>,
}

/// A boxed filter for dynamic dispatch
pub type BoxedFilter = Box<dyn UserFilter>;

/// Arc-wrapped filter for thread-safe sharing
pub type SharedFilter = Arc<dyn UserFilter>;

impl<F: UserFilter + ?Sized> UserFilter for Box<F> {
    fn accepts(&self, user: &User) -> bool {
        (**self).accepts(user)
    }

    fn metadata(&self) -> FilterMetadata {
        (**self).metadata()
    }
}

impl<F: UserFilter + ?Sized> UserFilter for Arc<F> {
    fn accepts(&self, user: &User) -> bool {
        (**self).accepts(user)
    }

    fn metadata(&self) -> FilterMetadata {
        (**self).metadata()
    }
}

/// Extension trait for filter composition
pub trait FilterExt: UserFilter {
    /// Keep only users accepted by both filters
    fn and<F>(self, next: F) -> ChainedFilter
    where
        Self: Sized + 'static,
        F: UserFilter + 'static,
    {
        ChainedFilter::new(Box::new(self), Box::new(next))
    }

    /// Convert to a shared filter
    fn shared(self) -> SharedFilter
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<T: UserFilter> FilterExt for T {}

/// A filter that requires two filters to accept
pub struct ChainedFilter {
    first: BoxedFilter,
    second: BoxedFilter,
}

impl ChainedFilter {
    /// Create a new chained filter
    pub fn new(first: BoxedFilter, second: BoxedFilter) -> Self {
        Self { first, second }
    }
}

impl UserFilter for ChainedFilter {
    fn accepts(&self, user: &User) -> bool {
        self.first.accepts(user) && self.second.accepts(user)
    }

    fn metadata(&self) -> FilterMetadata {
        let describe = |m: FilterMetadata| m.name.unwrap_or_else(|| "?".to_string());
        FilterMetadata {
            name: Some("ChainedFilter".to_string()),
            description: Some(format!(
                "{} and {}",
                describe(self.first.metadata()),
                describe(self.second.metadata())
            )),
        }
    }
}

/// Keeps every user
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl UserFilter for AcceptAll {
    fn accepts(&self, _user: &User) -> bool {
        true
    }
}

/// Keeps users strictly older than the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OlderThan(pub u32);

impl OlderThan {
    /// Threshold used by batch processing when none is given
    pub const DEFAULT_AGE: u32 = 25;
}

impl Default for OlderThan {
    fn default() -> Self {
        Self(Self::DEFAULT_AGE)
    }
}

impl UserFilter for OlderThan {
    fn accepts(&self, user: &User) -> bool {
        user.age > self.0
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata {
            name: Some(format!("age > {}", self.0)),
            description: Some("Users strictly older than the threshold".to_string()),
        }
    }
}

/// Adapter turning a closure into a filter
#[derive(Clone, Copy)]
pub struct FnFilter<F>(F);

/// Build a filter from a closure
pub fn filter_fn<F>(f: F) -> FnFilter<F>
where
    F: Fn(&User) -> bool + Send + Sync,
{
    FnFilter(f)
}

impl<F> UserFilter for FnFilter<F>
where
    F: Fn(&User) -> bool + Send + Sync,
{
    fn accepts(&self, user: &User) -> bool {
        (self.0)(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(age: u32) -> User {
        User::new("someone", "someone@example.com", age)
    }

    #[test]
    fn test_older_than_is_strict() {
        let filter = OlderThan::default();
        assert!(!filter.accepts(&user(25)));
        assert!(filter.accepts(&user(26)));
    }

    #[test]
    fn test_filter_chaining() {
        let chained = OlderThan(25).and(filter_fn(|u: &User| u.age < 60));

        assert!(!chained.accepts(&user(20)));
        assert!(chained.accepts(&user(30)));
        assert!(!chained.accepts(&user(61)));
        assert_eq!(
            chained.metadata().description.as_deref(),
            Some("age > 25 and ?")
        );
    }

    #[test]
    fn test_shared_filter() {
        let shared = OlderThan(40).shared();
        let clone = Arc::clone(&shared);
        assert!(clone.accepts(&user(41)));
        assert!(AcceptAll.accepts(&user(0)));
    }
}
