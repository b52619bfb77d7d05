//! Reviewer directory port.

use super::AnalyticsStoreResult;
use crate::task::domain::UserId;
use async_trait::async_trait;

/// Lookup contract for users holding the reviewer role.
#[async_trait]
pub trait ReviewerDirectory: Send + Sync {
    /// Returns `true` when `user` exists and is a reviewer.
    async fn is_reviewer(&self, user: UserId) -> AnalyticsStoreResult<bool>;
}
