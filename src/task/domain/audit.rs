//! Audit records emitted for persisted task mutations.

use super::{Actor, Task, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Action recorded in an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A task was created.
    TaskCreated,
    /// A task moved to a new status.
    StatusChanged,
    /// Task assignments or notes changed without a status change.
    DetailsUpdated,
}

impl AuditAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::StatusChanged => "status_changed",
            Self::DetailsUpdated => "details_updated",
        }
    }
}

/// Append-only audit record for a task mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// User that performed the action.
    pub actor_id: UserId,
    /// Action performed.
    pub action: AuditAction,
    /// Entity type affected.
    pub entity: String,
    /// Identifier of the affected entity.
    pub entity_id: String,
    /// Action-specific details.
    pub details: Value,
    /// Request metadata such as the acting role.
    pub metadata: Value,
    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    const TASK_ENTITY: &'static str = "task";

    /// Builds an entry describing a task status change.
    #[must_use]
    pub fn status_changed(
        actor: Actor,
        task: &Task,
        from: TaskStatus,
        requested: TaskStatus,
    ) -> Self {
        Self::for_task(
            actor,
            task,
            AuditAction::StatusChanged,
            json!({
                "from": from,
                "to": task.status(),
                "requested": requested,
                "rejectionNotes": task.rejection_notes(),
            }),
        )
    }

    /// Builds an entry describing a detail update.
    #[must_use]
    pub fn details_updated(actor: Actor, task: &Task) -> Self {
        Self::for_task(
            actor,
            task,
            AuditAction::DetailsUpdated,
            json!({
                "assignedEditor": task.assigned_editor(),
                "reviewer": task.reviewer(),
                "scheduler": task.scheduler(),
                "category": task.category(),
            }),
        )
    }

    /// Builds an entry describing task creation.
    #[must_use]
    pub fn task_created(actor: Actor, task: &Task) -> Self {
        Self::for_task(
            actor,
            task,
            AuditAction::TaskCreated,
            json!({
                "title": task.title(),
                "clientId": task.client_id(),
                "category": task.category(),
            }),
        )
    }

    fn for_task(actor: Actor, task: &Task, action: AuditAction, details: Value) -> Self {
        Self {
            actor_id: actor.user_id,
            action,
            entity: Self::TASK_ENTITY.to_owned(),
            entity_id: task.id().to_string(),
            details,
            metadata: json!({
                "role": actor.role,
                "version": task.version(),
            }),
            timestamp: task.updated_at(),
        }
    }
}
