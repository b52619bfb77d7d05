//! Ports for best-effort side effects of task mutations.
//!
//! Neither cache invalidation nor audit writes may block or fail a
//! transition. Services hand effects to a [`SideEffectQueue`]; a dispatcher
//! delivers them to the [`TaskListCache`] and [`AuditSink`] out of band.

use crate::task::domain::{AuditEntry, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for side-effect port operations.
pub type SideEffectResult<T> = Result<T, SideEffectError>;

const TASK_LIST_PREFIX: &str = "task-list";

/// Returns the cache key of one task-list view for `user`.
#[must_use]
pub fn task_list_key(user: UserId, view: &str) -> String {
    format!("{TASK_LIST_PREFIX}:{user}:{view}")
}

/// Returns the pattern matching every task-list view cached for `user`.
#[must_use]
pub fn task_list_pattern(user: UserId) -> String {
    format!("{TASK_LIST_PREFIX}:{user}:*")
}

/// Cache holding rendered task-list views.
#[async_trait]
pub trait TaskListCache: Send + Sync {
    /// Deletes every entry whose key matches the glob `pattern`.
    ///
    /// Returns the number of deleted entries.
    async fn delete_matching(&self, pattern: &str) -> SideEffectResult<u64>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends an entry.
    async fn append(&self, entry: &AuditEntry) -> SideEffectResult<()>;
}

/// A side effect awaiting delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Drop cached task-list views for each user.
    InvalidateTaskLists(Vec<UserId>),
    /// Record an audit entry.
    Audit(AuditEntry),
}

impl SideEffect {
    /// Returns a short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidateTaskLists(_) => "invalidate_task_lists",
            Self::Audit(_) => "audit",
        }
    }
}

/// Fire-and-forget hand-off of side effects.
pub trait SideEffectQueue: Send + Sync {
    /// Queues an effect for delivery. Never fails the caller.
    fn enqueue(&self, effect: SideEffect);
}

/// Errors returned by side-effect ports.
#[derive(Debug, Clone, Error)]
pub enum SideEffectError {
    /// The cache backend could not be reached or rejected the command.
    #[error("cache error: {0}")]
    Cache(Arc<dyn std::error::Error + Send + Sync>),

    /// The audit backend could not be reached or rejected the write.
    #[error("audit sink error: {0}")]
    Audit(Arc<dyn std::error::Error + Send + Sync>),

    /// A cache pattern could not be parsed.
    #[error("invalid cache key pattern '{0}'")]
    InvalidPattern(String),
}

impl SideEffectError {
    /// Wraps a cache failure.
    pub fn cache(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Cache(Arc::new(err))
    }

    /// Wraps an audit failure.
    pub fn audit(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Audit(Arc::new(err))
    }
}
