//! Concurrent assembly of reviewer performance reports.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::{
    AchievementEvaluator, AnalyticsError, AnalyticsResult, MetricsAggregator,
    RejectionClassifier, TrendMaterializer,
};
use crate::analytics::{
    domain::{PerformanceReport, RejectionReasonSummary, ReportPeriod, ReportSection},
    ports::{AchievementRepository, RejectionReasonRepository, ReviewerDirectory, TrendRepository},
};
use crate::config::AnalyticsConfig;
use crate::task::{domain::UserId, ports::TaskRepository};

/// Builds performance reports from independently computed sections.
///
/// Sections run concurrently. A failing section is reported as failed and
/// never discards the others.
pub struct PerformanceReportService<R, S, D, C>
where
    R: TaskRepository,
    S: TrendRepository + RejectionReasonRepository + AchievementRepository,
    D: ReviewerDirectory,
    C: Clock + Send + Sync,
{
    metrics: MetricsAggregator<R, C>,
    trends: TrendMaterializer<R, S, C>,
    rejections: RejectionClassifier<R, S, C>,
    achievements: AchievementEvaluator<R, S, C>,
    reviewers: Arc<D>,
    clock: Arc<C>,
    config: AnalyticsConfig,
}

impl<R, S, D, C> PerformanceReportService<R, S, D, C>
where
    R: TaskRepository,
    S: TrendRepository + RejectionReasonRepository + AchievementRepository,
    D: ReviewerDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a report service over shared stores.
    #[must_use]
    pub fn new(
        tasks: Arc<R>,
        store: Arc<S>,
        reviewers: Arc<D>,
        clock: Arc<C>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            metrics: MetricsAggregator::new(Arc::clone(&tasks), Arc::clone(&clock))
                .with_thresholds(config.quality_thresholds()),
            trends: TrendMaterializer::new(
                Arc::clone(&tasks),
                Arc::clone(&store),
                Arc::clone(&clock),
            ),
            rejections: RejectionClassifier::new(
                Arc::clone(&tasks),
                Arc::clone(&store),
                Arc::clone(&clock),
            )
            .with_scan_limit(config.rejection_scan_limit),
            achievements: AchievementEvaluator::new(tasks, store, Arc::clone(&clock))
                .with_thresholds(config.achievement_thresholds()),
            reviewers,
            clock,
            config,
        }
    }

    /// Returns the metrics aggregator.
    #[must_use]
    pub const fn metrics(&self) -> &MetricsAggregator<R, C> {
        &self.metrics
    }

    /// Returns the trend materializer.
    #[must_use]
    pub const fn trends(&self) -> &TrendMaterializer<R, S, C> {
        &self.trends
    }

    /// Returns the rejection classifier.
    #[must_use]
    pub const fn rejections(&self) -> &RejectionClassifier<R, S, C> {
        &self.rejections
    }

    /// Returns the achievement evaluator.
    #[must_use]
    pub const fn achievements(&self) -> &AchievementEvaluator<R, S, C> {
        &self.achievements
    }

    /// Assembles the performance report of `reviewer` for `period`.
    ///
    /// Computing the report refreshes the reviewer's derived records: the
    /// current monthly snapshot, rejection reasons, and achievements.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::ReviewerNotFound`] when the user is not a
    /// known reviewer and [`AnalyticsError::Store`] when the reviewer lookup
    /// fails. Section failures are reported inside the report.
    pub async fn get_performance_report(
        &self,
        reviewer: UserId,
        period: ReportPeriod,
    ) -> AnalyticsResult<PerformanceReport> {
        if !self.reviewers.is_reviewer(reviewer).await? {
            return Err(AnalyticsError::ReviewerNotFound(reviewer));
        }

        let (metrics, weekly_breakdown, monthly_trend, top_rejection_reasons, achievements) =
            tokio::join!(
                timed("metrics", self.metrics.review_metrics(reviewer, period)),
                timed("weeklyBreakdown", self.metrics.weekly_breakdown(reviewer)),
                timed(
                    "monthlyTrend",
                    self.trends.monthly_trend(reviewer, self.config.trend_months),
                ),
                timed("topRejectionReasons", self.rejection_section(reviewer)),
                timed("achievements", self.achievements.evaluate(reviewer)),
            );

        let report = PerformanceReport {
            reviewer_id: reviewer,
            period,
            generated_at: self.clock.utc(),
            metrics: section(reviewer, "metrics", metrics),
            weekly_breakdown: section(reviewer, "weeklyBreakdown", weekly_breakdown),
            monthly_trend: section(reviewer, "monthlyTrend", monthly_trend),
            top_rejection_reasons: section(
                reviewer,
                "topRejectionReasons",
                top_rejection_reasons,
            ),
            achievements: section(reviewer, "achievements", achievements),
        };
        info!(
            %reviewer,
            %period,
            complete = report.is_complete(),
            "performance report assembled"
        );
        Ok(report)
    }

    async fn rejection_section(
        &self,
        reviewer: UserId,
    ) -> AnalyticsResult<Vec<RejectionReasonSummary>> {
        self.rejections.classify(reviewer).await?;
        self.rejections
            .top_reasons(reviewer, self.config.top_reasons_limit)
            .await
    }
}

async fn timed<T>(name: &'static str, work: impl Future<Output = T>) -> T {
    let started = Instant::now();
    let output = work.await;
    debug!(section = name, elapsed = ?started.elapsed(), "report section computed");
    output
}

fn section<T>(
    reviewer: UserId,
    name: &'static str,
    result: AnalyticsResult<T>,
) -> ReportSection<T> {
    if let Err(err) = &result {
        warn!(%reviewer, section = name, error = %err, "report section failed");
    }
    ReportSection::from_result(result)
}
