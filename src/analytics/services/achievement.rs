//! Threshold achievement evaluation.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::{AnalyticsResult, MetricsAggregator};
use crate::analytics::{
    domain::{
        Achievement, AchievementEvidence, AchievementThresholds, AchievementType, ReportPeriod,
    },
    ports::AchievementRepository,
};
use crate::task::{domain::UserId, ports::TaskRepository};

/// Grants, refreshes, and revokes achievements on every evaluation.
///
/// A stored achievement exists only while its rule held at the last
/// evaluation.
#[derive(Clone)]
pub struct AchievementEvaluator<R, A, C>
where
    R: TaskRepository,
    A: AchievementRepository,
    C: Clock + Send + Sync,
{
    metrics: MetricsAggregator<R, C>,
    achievements: Arc<A>,
    clock: Arc<C>,
    thresholds: AchievementThresholds,
}

impl<R, A, C> AchievementEvaluator<R, A, C>
where
    R: TaskRepository,
    A: AchievementRepository,
    C: Clock + Send + Sync,
{
    /// Creates an evaluator with default thresholds.
    #[must_use]
    pub fn new(tasks: Arc<R>, achievements: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            metrics: MetricsAggregator::new(tasks, Arc::clone(&clock)),
            achievements,
            clock,
            thresholds: AchievementThresholds::default(),
        }
    }

    /// Replaces the achievement thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: AchievementThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Collects the figures the rules are checked against.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store fails.
    pub async fn evidence(&self, reviewer: UserId) -> AnalyticsResult<AchievementEvidence> {
        let now = self.clock.utc();
        let monthly = self
            .metrics
            .stats_in(reviewer, ReportPeriod::Month.window_ending(now))
            .await?;
        let weekly_reviews = self
            .metrics
            .reviewed_count(reviewer, ReportPeriod::Week.window_ending(now))
            .await?;
        Ok(AchievementEvidence {
            monthly_approval_rate: monthly.approval_rate(),
            monthly_reviews: monthly.total(),
            weekly_reviews,
        })
    }

    /// Re-evaluates every rule for `reviewer` and returns the achievements
    /// held afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the task store or achievement store fails.
    pub async fn evaluate(
        &self,
        reviewer: UserId,
    ) -> AnalyticsResult<BTreeMap<AchievementType, Achievement>> {
        let evidence = self.evidence(reviewer).await?;
        let now = self.clock.utc();
        let mut held = BTreeMap::new();

        for kind in AchievementType::ALL {
            if kind.is_earned(&evidence, self.thresholds) {
                let existing = self.achievements.find_achievement(reviewer, kind).await?;
                let achievement =
                    Achievement::grant_or_refresh(reviewer, kind, &evidence, existing.as_ref(), now);
                self.achievements.upsert_achievement(&achievement).await?;
                if existing.is_none() {
                    info!(%reviewer, achievement = %kind, "achievement granted");
                }
                held.insert(kind, achievement);
            } else if self.achievements.remove_achievement(reviewer, kind).await? {
                info!(%reviewer, achievement = %kind, "achievement revoked");
            }
        }
        Ok(held)
    }
}
