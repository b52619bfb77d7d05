//! Port contracts for reviewer analytics.
//!
//! Raw task data is read through [`crate::task::ports::TaskRepository`]; the
//! ports here cover the derived records and the reviewer lookup.

pub mod reviewers;
pub mod store;

pub use reviewers::ReviewerDirectory;
pub use store::{
    AchievementRepository, AnalyticsStoreError, AnalyticsStoreResult, RejectionReasonRepository,
    TrendRepository,
};
