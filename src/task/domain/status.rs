//! Task lifecycle status and production category.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The wire representation is stable and shared with external consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// An editor is working on the task.
    InProgress,
    /// Work is finished and waiting for quality control.
    ReadyForQc,
    /// A reviewer is checking the work.
    QcInProgress,
    /// Work has been approved.
    Completed,
    /// Work is temporarily paused.
    OnHold,
    /// Work was rejected during review.
    Rejected,
    /// Work is waiting for the client's own review.
    ClientReview,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::InProgress,
        Self::ReadyForQc,
        Self::QcInProgress,
        Self::Completed,
        Self::OnHold,
        Self::Rejected,
        Self::ClientReview,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::ReadyForQc => "READY_FOR_QC",
            Self::QcInProgress => "QC_IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
            Self::Rejected => "REJECTED",
            Self::ClientReview => "CLIENT_REVIEW",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// Production category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Video editing work.
    Video,
    /// Graphic design work.
    Design,
    /// Written copy.
    Copywriting,
    /// Anything not covered by the dedicated categories.
    General,
}

impl TaskCategory {
    /// Categories reported individually in reviewer analytics.
    pub const REPORTED: [Self; 3] = [Self::Video, Self::Design, Self::Copywriting];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Design => "design",
            Self::Copywriting => "copywriting",
            Self::General => "general",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
