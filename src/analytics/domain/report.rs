//! Partial-result reviewer performance report.

use super::{
    Achievement, AchievementType, MonthlyTrend, RejectionReasonSummary, ReportPeriod,
    ReviewMetrics, WeeklyBreakdown,
};
use crate::task::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of one independently computed report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportSection<T> {
    /// The section was computed.
    Ready {
        /// Section payload.
        data: T,
    },
    /// The section could not be computed.
    Failed {
        /// Human-readable failure description.
        error: String,
    },
}

impl<T> ReportSection<T> {
    /// Converts a section result, keeping only the error message on failure.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ready { data },
            Err(err) => Self::Failed {
                error: err.to_string(),
            },
        }
    }

    /// Returns the payload when the section is ready.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the failure message when the section failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Returns `true` when the section was computed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Performance report for one reviewer and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// Reviewer the report describes.
    pub reviewer_id: UserId,
    /// Requested period.
    pub period: ReportPeriod,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Headline metrics over the requested period.
    pub metrics: ReportSection<ReviewMetrics>,
    /// Summary of the current week.
    pub weekly_breakdown: ReportSection<WeeklyBreakdown>,
    /// Recent monthly snapshots, oldest first.
    pub monthly_trend: ReportSection<Vec<MonthlyTrend>>,
    /// Most frequent rejection reasons.
    pub top_rejection_reasons: ReportSection<Vec<RejectionReasonSummary>>,
    /// Achievements held after this evaluation.
    pub achievements: ReportSection<BTreeMap<AchievementType, Achievement>>,
}

impl PerformanceReport {
    /// Returns `true` when every section is ready.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_sections().is_empty()
    }

    /// Returns the names of sections that failed.
    #[must_use]
    pub fn failed_sections(&self) -> Vec<&'static str> {
        [
            ("metrics", self.metrics.is_ready()),
            ("weeklyBreakdown", self.weekly_breakdown.is_ready()),
            ("monthlyTrend", self.monthly_trend.is_ready()),
            ("topRejectionReasons", self.top_rejection_reasons.is_ready()),
            ("achievements", self.achievements.is_ready()),
        ]
        .into_iter()
        .filter_map(|(name, ready)| (!ready).then_some(name))
        .collect()
    }
}
