//! Service-level errors for analytics operations.

use crate::analytics::{domain::AnalyticsDomainError, ports::AnalyticsStoreError};
use crate::task::{domain::UserId, ports::TaskRepositoryError};
use thiserror::Error;

/// Errors returned by analytics services.
#[derive(Debug, Clone, Error)]
pub enum AnalyticsError {
    /// The user is unknown or does not hold the reviewer role.
    #[error("reviewer not found: {0}")]
    ReviewerNotFound(UserId),

    /// Raw task data could not be read.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// A derived record could not be read or written.
    #[error(transparent)]
    Store(#[from] AnalyticsStoreError),

    /// A derived value was malformed.
    #[error(transparent)]
    Domain(#[from] AnalyticsDomainError),
}

/// Result type for analytics services.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
