//! Error types for analytics domain values.

use thiserror::Error;

/// Errors returned when an analytics value cannot be constructed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsDomainError {
    /// The month does not exist in the calendar.
    #[error("invalid calendar month: {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month number.
        month: u32,
    },

    /// The report period is not one of week, month, or year.
    #[error("unknown report period: {0}")]
    UnknownPeriod(String),

    /// The rejection label is not part of the taxonomy.
    #[error("unknown rejection label: {0}")]
    UnknownRejectionLabel(String),
}
