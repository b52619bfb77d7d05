//! In-memory store for derived analytics records.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::analytics::{
    domain::{Achievement, AchievementType, MonthlyTrend, RejectionLabel, RejectionReason, YearMonth},
    ports::{
        AchievementRepository, AnalyticsStoreError, AnalyticsStoreResult,
        RejectionReasonRepository, TrendRepository,
    },
};
use crate::task::domain::UserId;

#[derive(Debug, Default)]
struct StoreState {
    trends: HashMap<(UserId, YearMonth), MonthlyTrend>,
    reasons: HashMap<(UserId, RejectionLabel), RejectionReason>,
    achievements: HashMap<(UserId, AchievementType), Achievement>,
    trend_writes: usize,
}

/// Thread-safe in-memory implementation of every analytics repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnalyticsStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryAnalyticsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored snapshot for `reviewer`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsStoreError::Persistence`] when the lock is poisoned.
    pub fn trends_for(&self, reviewer: UserId) -> AnalyticsStoreResult<Vec<MonthlyTrend>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut trends: Vec<MonthlyTrend> = state
            .trends
            .iter()
            .filter(|((owner, _), _)| *owner == reviewer)
            .map(|(_, trend)| trend.clone())
            .collect();
        trends.sort_by_key(|trend| (trend.year, trend.month));
        Ok(trends)
    }

    /// Returns how many snapshot upserts have been applied.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsStoreError::Persistence`] when the lock is poisoned.
    pub fn trend_writes(&self) -> AnalyticsStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.trend_writes)
    }

    /// Returns the stored record for `reviewer` and `label`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsStoreError::Persistence`] when the lock is poisoned.
    pub fn reason(
        &self,
        reviewer: UserId,
        label: RejectionLabel,
    ) -> AnalyticsStoreResult<Option<RejectionReason>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.reasons.get(&(reviewer, label)).cloned())
    }
}

fn lock_error(err: impl std::fmt::Display) -> AnalyticsStoreError {
    AnalyticsStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TrendRepository for InMemoryAnalyticsStore {
    async fn find_month(
        &self,
        reviewer: UserId,
        month: YearMonth,
    ) -> AnalyticsStoreResult<Option<MonthlyTrend>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.trends.get(&(reviewer, month)).cloned())
    }

    async fn upsert_month(&self, trend: &MonthlyTrend) -> AnalyticsStoreResult<()> {
        let month = trend
            .year_month()
            .map_err(AnalyticsStoreError::persistence)?;
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .trends
            .insert((trend.reviewer_id, month), trend.clone());
        state.trend_writes = state.trend_writes.saturating_add(1);
        Ok(())
    }
}

#[async_trait]
impl RejectionReasonRepository for InMemoryAnalyticsStore {
    async fn upsert_reason(&self, reason: &RejectionReason) -> AnalyticsStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .reasons
            .insert((reason.reviewer_id, reason.label), reason.clone());
        Ok(())
    }

    async fn top_reasons(
        &self,
        reviewer: UserId,
        limit: usize,
    ) -> AnalyticsStoreResult<Vec<RejectionReason>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut reasons: Vec<RejectionReason> = state
            .reasons
            .values()
            .filter(|reason| reason.reviewer_id == reviewer)
            .cloned()
            .collect();
        reasons.sort_by_key(|reason| (Reverse(reason.case_count), reason.label));
        reasons.truncate(limit);
        Ok(reasons)
    }
}

#[async_trait]
impl AchievementRepository for InMemoryAnalyticsStore {
    async fn find_achievement(
        &self,
        reviewer: UserId,
        kind: AchievementType,
    ) -> AnalyticsStoreResult<Option<Achievement>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.achievements.get(&(reviewer, kind)).cloned())
    }

    async fn upsert_achievement(&self, achievement: &Achievement) -> AnalyticsStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.achievements.insert(
            (achievement.reviewer_id, achievement.kind),
            achievement.clone(),
        );
        Ok(())
    }

    async fn remove_achievement(
        &self,
        reviewer: UserId,
        kind: AchievementType,
    ) -> AnalyticsStoreResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.achievements.remove(&(reviewer, kind)).is_some())
    }

    async fn list_achievements(&self, reviewer: UserId) -> AnalyticsStoreResult<Vec<Achievement>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut held: Vec<Achievement> = state
            .achievements
            .values()
            .filter(|achievement| achievement.reviewer_id == reviewer)
            .cloned()
            .collect();
        held.sort_by_key(|achievement| achievement.kind);
        Ok(held)
    }
}
