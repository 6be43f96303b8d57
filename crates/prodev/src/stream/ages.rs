use futures::stream::{BoxStream, TryStreamExt};
use serde::Serialize;

use crate::user::{UserRepository, UserResult};

/// Every user's age, one row at a time.
pub fn stream_user_ages(repo: &dyn UserRepository) -> BoxStream<'_, UserResult<u32>> {
    repo.stream_ages()
}

/// Running count and sum of ages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeSummary {
    pub count: u64,
    pub total: u64,
}

impl AgeSummary {
    pub fn add(&mut self, age: u32) {
        self.count += 1;
        self.total += u64::from(age);
    }

    /// Mean age, `None` when no rows were seen
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / self.count as f64)
    }
}

/// Count and sum every age in a single pass, without loading the table.
pub async fn age_summary(repo: &dyn UserRepository) -> UserResult<AgeSummary> {
    stream_user_ages(repo)
        .try_fold(AgeSummary::default(), |mut summary, age| async move {
            summary.add(age);
            Ok(summary)
        })
        .await
}

/// Average age of all users, `None` for an empty table.
pub async fn average_age(repo: &dyn UserRepository) -> UserResult<Option<f64>> {
    Ok(age_summary(repo).await?.average())
}
