//! Rolling review metrics computed by direct query.

use std::sync::Arc;

use mockable::Clock;

use super::AnalyticsResult;
use crate::analytics::domain::{
    QualityThresholds, REVIEWED_STATUSES, ReportPeriod, ReviewMetrics, ReviewStats, TimeWindow,
    WeeklyBreakdown,
};
use crate::task::{
    domain::{Task, UserId},
    ports::{TaskQuery, TaskRepository},
};

/// Computes review metrics for a reviewer over calendar windows.
///
/// Nothing is cached; every call reads the task store.
#[derive(Clone)]
pub struct MetricsAggregator<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    clock: Arc<C>,
    thresholds: QualityThresholds,
}

impl<R, C> MetricsAggregator<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator with default category thresholds.
    #[must_use]
    pub fn new(tasks: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            clock,
            thresholds: QualityThresholds::default(),
        }
    }

    /// Replaces the category label thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Returns the reviewed tasks of `reviewer` last updated inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsError::Tasks`] when the store fails.
    pub async fn reviewed_in(
        &self,
        reviewer: UserId,
        window: TimeWindow,
    ) -> AnalyticsResult<Vec<Task>> {
        Ok(self.tasks.query(&reviewed_query(reviewer, window)).await?)
    }

    /// Aggregates counters for `reviewer` over `window`.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsError::Tasks`] when the store fails.
    pub async fn stats_in(
        &self,
        reviewer: UserId,
        window: TimeWindow,
    ) -> AnalyticsResult<ReviewStats> {
        let reviewed = self.reviewed_in(reviewer, window).await?;
        Ok(ReviewStats::from_tasks(&reviewed))
    }

    /// Counts reviews by `reviewer` inside `window` without loading them.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsError::Tasks`] when the store fails.
    pub async fn reviewed_count(
        &self,
        reviewer: UserId,
        window: TimeWindow,
    ) -> AnalyticsResult<u64> {
        Ok(self.tasks.count(&reviewed_query(reviewer, window)).await?)
    }

    /// Computes headline metrics over the period containing now.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsError::Tasks`] when the store fails.
    pub async fn review_metrics(
        &self,
        reviewer: UserId,
        period: ReportPeriod,
    ) -> AnalyticsResult<ReviewMetrics> {
        let window = period.window_ending(self.clock.utc());
        let reviewed = self.reviewed_in(reviewer, window).await?;
        Ok(ReviewMetrics::from_tasks(window, &reviewed, self.thresholds))
    }

    /// Summarizes the current calendar week.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsError::Tasks`] when the store fails.
    pub async fn weekly_breakdown(&self, reviewer: UserId) -> AnalyticsResult<WeeklyBreakdown> {
        let window = ReportPeriod::Week.window_ending(self.clock.utc());
        Ok(self.stats_in(reviewer, window).await?.into())
    }
}

fn reviewed_query(reviewer: UserId, window: TimeWindow) -> TaskQuery {
    TaskQuery::new()
        .reviewed_by(reviewer)
        .with_statuses(REVIEWED_STATUSES)
        .updated_between(window.start, window.end)
}
