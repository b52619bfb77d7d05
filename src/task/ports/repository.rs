//! Repository port for task persistence and filtered lookup.

use crate::task::domain::{Task, TaskId, TaskStatus, TaskVersion, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter over stored tasks.
///
/// Empty criteria match every task. Results are returned newest first by
/// `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to tasks reviewed by this user.
    pub reviewer: Option<UserId>,
    /// Restrict to these statuses; empty means any status.
    pub statuses: Vec<TaskStatus>,
    /// Inclusive lower bound on `updated_at`.
    pub updated_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `updated_at`.
    pub updated_until: Option<DateTime<Utc>>,
    /// Only tasks with non-blank rejection notes.
    pub with_rejection_notes: bool,
    /// Maximum number of tasks to return.
    pub limit: Option<usize>,
}

impl TaskQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to tasks reviewed by `reviewer`.
    #[must_use]
    pub const fn reviewed_by(mut self, reviewer: UserId) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Restricts to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Restricts to tasks updated within `[from, until]`.
    #[must_use]
    pub const fn updated_between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.updated_from = Some(from);
        self.updated_until = Some(until);
        self
    }

    /// Restricts to tasks with non-blank rejection notes.
    #[must_use]
    pub const fn with_rejection_notes(mut self) -> Self {
        self.with_rejection_notes = true;
        self
    }

    /// Caps the number of returned tasks.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when `task` satisfies every criterion except `limit`.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.reviewer.is_none_or(|reviewer| task.reviewer() == Some(reviewer))
            && (self.statuses.is_empty() || self.statuses.contains(&task.status()))
            && self.updated_from.is_none_or(|from| task.updated_at() >= from)
            && self
                .updated_until
                .is_none_or(|until| task.updated_at() <= until)
            && (!self.with_rejection_notes || task.has_rejection_notes())
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces a stored task if its stored version still equals
    /// `expected_prior`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::VersionConflict`] when another writer got
    /// there first.
    async fn update(&self, task: &Task, expected_prior: TaskVersion) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks matching `query`, newest first by `updated_at`.
    async fn query(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Counts tasks matching `query`, ignoring its limit.
    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version differs from the one the writer read.
    #[error("task {task_id} changed concurrently: expected {expected}, stored {actual}")]
    VersionConflict {
        /// Task being written.
        task_id: TaskId,
        /// Version the writer expected to replace.
        expected: TaskVersion,
        /// Version currently stored.
        actual: TaskVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
