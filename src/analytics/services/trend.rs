//! Monthly snapshot materialization.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::{AnalyticsResult, MetricsAggregator};
use crate::analytics::{
    domain::{MonthlyTrend, TimeWindow, YearMonth},
    ports::TrendRepository,
};
use crate::task::{domain::UserId, ports::TaskRepository};

/// Maintains one snapshot row per reviewer and calendar month.
///
/// The open month is recomputed on every read. A closed month is computed
/// once after it ends and then served from its stored snapshot; partial rows
/// written before the month ended are recomputed on first read.
#[derive(Clone)]
pub struct TrendMaterializer<R, T, C>
where
    R: TaskRepository,
    T: TrendRepository,
    C: Clock + Send + Sync,
{
    metrics: MetricsAggregator<R, C>,
    trends: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> TrendMaterializer<R, T, C>
where
    R: TaskRepository,
    T: TrendRepository,
    C: Clock + Send + Sync,
{
    /// Creates a materializer.
    #[must_use]
    pub fn new(tasks: Arc<R>, trends: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            metrics: MetricsAggregator::new(tasks, Arc::clone(&clock)),
            trends,
            clock,
        }
    }

    /// Recomputes `month` for `reviewer` and overwrites its snapshot.
    ///
    /// An open month is aggregated up to now.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store or trend store fails.
    pub async fn materialize_month(
        &self,
        reviewer: UserId,
        month: YearMonth,
    ) -> AnalyticsResult<MonthlyTrend> {
        let now = self.clock.utc();
        let whole = month.window();
        let open = month.is_open_at(now);
        let window = if open {
            TimeWindow::new(whole.start, now.min(whole.end))
        } else {
            whole
        };

        let stats = self.metrics.stats_in(reviewer, window).await?;
        let trend = MonthlyTrend::from_stats(reviewer, month, &stats, !open);
        self.trends.upsert_month(&trend).await?;
        debug!(%reviewer, %month, reviews = trend.review_count, "monthly trend materialized");
        Ok(trend)
    }

    /// Returns the last `months` snapshots ending with the current month,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store or trend store fails.
    pub async fn monthly_trend(
        &self,
        reviewer: UserId,
        months: usize,
    ) -> AnalyticsResult<Vec<MonthlyTrend>> {
        let current = YearMonth::containing(self.clock.utc());
        let mut rows = Vec::with_capacity(months);
        for month in current.trailing(months) {
            let row = if month == current {
                self.materialize_month(reviewer, month).await?
            } else {
                let stored = self.trends.find_month(reviewer, month).await?;
                match stored {
                    Some(snapshot) if snapshot.closed => snapshot,
                    _ => self.materialize_month(reviewer, month).await?,
                }
            };
            rows.push(row);
        }
        Ok(rows)
    }
}
