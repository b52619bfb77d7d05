//! Review statistics derived from reviewed tasks.
//!
//! A task counts as reviewed when its status is `COMPLETED` (approved) or
//! `REJECTED`. Review time is the span between creation and the last update.

use super::TimeWindow;
use crate::task::domain::{Task, TaskCategory, TaskStatus};
use serde::{Deserialize, Serialize};

/// Statuses that mark a task as reviewed.
pub const REVIEWED_STATUSES: [TaskStatus; 2] = [TaskStatus::Completed, TaskStatus::Rejected];

/// Raw counters for a set of reviewed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
    /// Tasks in `COMPLETED`.
    pub approved: u64,
    /// Tasks in `REJECTED`.
    pub rejected: u64,
    /// Approved tasks that never carried rejection notes.
    pub first_pass: u64,
    /// Sum of review durations in seconds.
    pub total_review_seconds: i64,
}

impl ReviewStats {
    /// Accumulates counters over `tasks`, skipping tasks that are not
    /// reviewed.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            match task.status() {
                TaskStatus::Completed => {
                    stats.approved += 1;
                    if !task.has_rejection_notes() {
                        stats.first_pass += 1;
                    }
                }
                TaskStatus::Rejected => stats.rejected += 1,
                _ => return stats,
            }
            let seconds = (task.updated_at() - task.created_at()).num_seconds().max(0);
            stats.total_review_seconds = stats.total_review_seconds.saturating_add(seconds);
            stats
        })
    }

    /// Number of reviewed tasks.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.approved + self.rejected
    }

    /// Mean review time in whole minutes, or 0 when nothing was reviewed.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "mean minutes are rounded to the nearest integer"
    )]
    pub fn avg_review_minutes(&self) -> i64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let mean_seconds = self.total_review_seconds as f64 / total as f64;
        (mean_seconds / 60.0).round() as i64
    }

    /// Share of reviewed tasks that were approved.
    #[must_use]
    pub fn approval_rate(&self) -> f64 {
        percentage(self.approved, self.total())
    }

    /// Share of reviewed tasks approved without any rejection notes.
    #[must_use]
    pub fn first_pass_rate(&self) -> f64 {
        percentage(self.first_pass, self.total())
    }
}

/// Returns `100 × numerator / denominator` rounded to one decimal place and
/// clamped to `[0, 100]`; 0 when the denominator is 0.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "rates are reported as one-decimal percentages"
)]
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let raw = numerator as f64 * 100.0 / denominator as f64;
    ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

/// Rate thresholds used to label category performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    /// Minimum rate labelled excellent.
    pub excellent: f64,
    /// Minimum rate labelled good.
    pub good: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 85.0,
            good: 75.0,
        }
    }
}

/// Qualitative label for a category approval rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    /// At or above the excellent threshold.
    Excellent,
    /// At or above the good threshold.
    Good,
    /// Below the good threshold.
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl QualityLabel {
    /// Labels `rate` against `thresholds`.
    #[must_use]
    pub fn for_rate(rate: f64, thresholds: QualityThresholds) -> Self {
        if rate >= thresholds.excellent {
            Self::Excellent
        } else if rate >= thresholds.good {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Review counts for one task category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReview {
    /// Category being summarized.
    pub category: TaskCategory,
    /// Reviewed tasks in the category.
    pub count: u64,
    /// Approval rate within the category.
    pub approval_rate: f64,
    /// Label derived from the approval rate.
    pub label: QualityLabel,
}

impl CategoryReview {
    /// Summarizes the reviewed tasks of `category`.
    pub fn summarize<'a>(
        category: TaskCategory,
        tasks: impl IntoIterator<Item = &'a Task>,
        thresholds: QualityThresholds,
    ) -> Self {
        let stats =
            ReviewStats::from_tasks(tasks.into_iter().filter(|task| task.category() == category));
        let approval_rate = stats.approval_rate();
        Self {
            category,
            count: stats.total(),
            approval_rate,
            label: QualityLabel::for_rate(approval_rate, thresholds),
        }
    }
}

/// Headline review metrics for one reviewer and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetrics {
    /// Window the metrics cover.
    pub window: TimeWindow,
    /// Mean review time in minutes.
    pub avg_review_time: i64,
    /// Share of reviews approved.
    pub approval_rate: f64,
    /// Share of reviews approved without rejection notes.
    pub first_pass_rate: f64,
    /// Number of reviewed tasks.
    pub total_reviewed: u64,
    /// Approved reviews.
    pub approved: u64,
    /// Rejected reviews.
    pub rejected: u64,
    /// Per-category breakdown for video, design, and copywriting.
    pub reviews_by_category: Vec<CategoryReview>,
}

impl ReviewMetrics {
    /// Builds metrics from the reviewed tasks inside `window`.
    #[must_use]
    pub fn from_tasks(window: TimeWindow, tasks: &[Task], thresholds: QualityThresholds) -> Self {
        let stats = ReviewStats::from_tasks(tasks);
        Self {
            window,
            avg_review_time: stats.avg_review_minutes(),
            approval_rate: stats.approval_rate(),
            first_pass_rate: stats.first_pass_rate(),
            total_reviewed: stats.total(),
            approved: stats.approved,
            rejected: stats.rejected,
            reviews_by_category: TaskCategory::REPORTED
                .into_iter()
                .map(|category| CategoryReview::summarize(category, tasks, thresholds))
                .collect(),
        }
    }
}

/// Compact summary of the current week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBreakdown {
    /// Approved reviews this week.
    pub approved: u64,
    /// Rejected reviews this week.
    pub rejected: u64,
    /// Mean review time in minutes.
    pub avg_time: i64,
    /// Share of reviews approved without rejection notes.
    pub first_pass_rate: f64,
}

impl From<ReviewStats> for WeeklyBreakdown {
    fn from(stats: ReviewStats) -> Self {
        Self {
            approved: stats.approved,
            rejected: stats.rejected,
            avg_time: stats.avg_review_minutes(),
            first_pass_rate: stats.first_pass_rate(),
        }
    }
}
