//! Monthly review snapshots.

use super::{ReviewStats, YearMonth};
use crate::task::domain::UserId;
use serde::{Deserialize, Serialize};

/// Review counters for one reviewer and calendar month.
///
/// Rows are keyed by `(reviewer_id, year, month)` and carry no timestamp, so
/// recomputing a month from unchanged data yields an identical row. A row
/// written while its month was still open is a partial and has `closed`
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Reviewer the row describes.
    pub reviewer_id: UserId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, `1..=12`.
    pub month: u32,
    /// Reviewed tasks in the month.
    pub review_count: u64,
    /// Approved reviews.
    pub approved_count: u64,
    /// Rejected reviews.
    pub rejected_count: u64,
    /// Mean review time in minutes.
    pub avg_review_time: i64,
    /// Share of reviews approved.
    pub approval_rate: f64,
    /// Whether the month had ended when the row was computed.
    #[serde(default)]
    pub closed: bool,
}

impl MonthlyTrend {
    /// Builds the row for `month` from aggregated counters.
    #[must_use]
    pub fn from_stats(
        reviewer_id: UserId,
        month: YearMonth,
        stats: &ReviewStats,
        closed: bool,
    ) -> Self {
        let review_count = stats.total();
        Self {
            reviewer_id,
            year: month.year(),
            month: month.month(),
            review_count,
            approved_count: stats.approved,
            rejected_count: review_count.saturating_sub(stats.approved),
            avg_review_time: stats.avg_review_minutes(),
            approval_rate: stats.approval_rate(),
            closed,
        }
    }

    /// Returns the month the row describes.
    ///
    /// # Errors
    ///
    /// Returns [`super::AnalyticsDomainError::InvalidMonth`] when the stored
    /// month is out of range.
    pub fn year_month(&self) -> Result<YearMonth, super::AnalyticsDomainError> {
        YearMonth::new(self.year, self.month)
    }
}
