//! Error types for task domain rules and parsing.

use super::{ActorRole, TaskId, TaskStatus, TaskVersion};
use thiserror::Error;

/// Errors returned when a task rule rejects a mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The actor's role may not move a task into the requested status.
    #[error("role {role} may not move task {task_id} to {target}")]
    TransitionForbidden {
        /// Task being transitioned.
        task_id: TaskId,
        /// Role of the acting user.
        role: ActorRole,
        /// Requested target status.
        target: TaskStatus,
    },

    /// The actor's role may not change the requested task fields.
    #[error("role {role} may not change assignment fields of task {task_id}")]
    FieldChangeForbidden {
        /// Task being updated.
        task_id: TaskId,
        /// Role of the acting user.
        role: ActorRole,
    },

    /// The actor's role may not create tasks.
    #[error("role {0} may not create tasks")]
    CreationForbidden(ActorRole),

    /// The caller supplied a version that no longer matches the task.
    #[error("task {task_id} is at {actual}, caller expected {expected}")]
    StaleVersion {
        /// Task being mutated.
        task_id: TaskId,
        /// Version supplied by the caller.
        expected: TaskVersion,
        /// Version currently held by the task.
        actual: TaskVersion,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing an actor role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown actor role: {0}")]
pub struct ParseActorRoleError(pub String);
