//! Domain model for reviewer analytics.
//!
//! Analytics values are derived from reviewed tasks: rolling metrics over a
//! calendar window, monthly snapshots, keyword-classified rejection reasons,
//! and threshold achievements. None of them feed back into the workflow.

mod achievement;
mod error;
mod metrics;
mod rejection;
mod report;
mod trend;
mod window;

pub use achievement::{
    Achievement, AchievementEvidence, AchievementThresholds, AchievementType,
};
pub use error::AnalyticsDomainError;
pub use metrics::{
    CategoryReview, QualityLabel, QualityThresholds, REVIEWED_STATUSES, ReviewMetrics,
    ReviewStats, WeeklyBreakdown, percentage,
};
pub use rejection::{RejectionLabel, RejectionReason, RejectionReasonSummary};
pub use report::{PerformanceReport, ReportSection};
pub use trend::MonthlyTrend;
pub use window::{ReportPeriod, TimeWindow, YearMonth};
