//! In-memory reviewer directory.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::analytics::ports::{AnalyticsStoreError, AnalyticsStoreResult, ReviewerDirectory};
use crate::task::domain::UserId;

/// Thread-safe set of known reviewers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewerDirectory {
    reviewers: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryReviewerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `user` as a reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsStoreError::Persistence`] when the lock is poisoned.
    pub fn register(&self, user: UserId) -> AnalyticsStoreResult<()> {
        let mut reviewers = self.reviewers.write().map_err(|err| {
            AnalyticsStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        reviewers.insert(user);
        Ok(())
    }
}

#[async_trait]
impl ReviewerDirectory for InMemoryReviewerDirectory {
    async fn is_reviewer(&self, user: UserId) -> AnalyticsStoreResult<bool> {
        let reviewers = self.reviewers.read().map_err(|err| {
            AnalyticsStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(reviewers.contains(&user))
    }
}
