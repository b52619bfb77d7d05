//! Persistence ports for derived analytics records.
//!
//! Derived records are upserted lazily when a report is requested. Method
//! names are distinct per record kind so one adapter may serve all three.

use crate::analytics::domain::{
    Achievement, AchievementType, MonthlyTrend, RejectionReason, YearMonth,
};
use crate::task::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for analytics store operations.
pub type AnalyticsStoreResult<T> = Result<T, AnalyticsStoreError>;

/// Monthly snapshot persistence.
#[async_trait]
pub trait TrendRepository: Send + Sync {
    /// Finds the snapshot for `reviewer` and `month`.
    async fn find_month(
        &self,
        reviewer: UserId,
        month: YearMonth,
    ) -> AnalyticsStoreResult<Option<MonthlyTrend>>;

    /// Inserts or overwrites the snapshot keyed by reviewer, year, and month.
    async fn upsert_month(&self, trend: &MonthlyTrend) -> AnalyticsStoreResult<()>;
}

/// Rejection reason persistence.
#[async_trait]
pub trait RejectionReasonRepository: Send + Sync {
    /// Inserts or overwrites the record keyed by reviewer and label.
    async fn upsert_reason(&self, reason: &RejectionReason) -> AnalyticsStoreResult<()>;

    /// Returns up to `limit` records for `reviewer`, ordered by case count
    /// descending and then by label order.
    async fn top_reasons(
        &self,
        reviewer: UserId,
        limit: usize,
    ) -> AnalyticsStoreResult<Vec<RejectionReason>>;
}

/// Achievement persistence.
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Finds the achievement of `kind` held by `reviewer`.
    async fn find_achievement(
        &self,
        reviewer: UserId,
        kind: AchievementType,
    ) -> AnalyticsStoreResult<Option<Achievement>>;

    /// Inserts or overwrites the achievement keyed by reviewer and kind.
    async fn upsert_achievement(&self, achievement: &Achievement) -> AnalyticsStoreResult<()>;

    /// Removes the achievement of `kind` held by `reviewer`.
    ///
    /// Returns `true` when a record was removed.
    async fn remove_achievement(
        &self,
        reviewer: UserId,
        kind: AchievementType,
    ) -> AnalyticsStoreResult<bool>;

    /// Lists every achievement held by `reviewer`.
    async fn list_achievements(&self, reviewer: UserId) -> AnalyticsStoreResult<Vec<Achievement>>;
}

/// Errors returned by analytics store implementations.
#[derive(Debug, Clone, Error)]
pub enum AnalyticsStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AnalyticsStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
