//! Task aggregate root and the rules that mutate it.

use super::{
    Actor, ActorRole, ClientId, TaskCategory, TaskDomainError, TaskId, TaskStatus, TaskVersion,
    UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Optional field updates carried alongside a transition or detail update.
///
/// `None` leaves a field untouched. Rejection notes that are blank after
/// trimming clear the stored notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFieldChanges {
    /// New assigned editor.
    pub assigned_editor: Option<UserId>,
    /// New reviewer.
    pub reviewer: Option<UserId>,
    /// New scheduler.
    pub scheduler: Option<UserId>,
    /// New production category.
    pub category: Option<TaskCategory>,
    /// New rejection notes.
    pub rejection_notes: Option<String>,
}

impl TaskFieldChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the assigned editor.
    #[must_use]
    pub const fn with_assigned_editor(mut self, editor: UserId) -> Self {
        self.assigned_editor = Some(editor);
        self
    }

    /// Sets the reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer: UserId) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Sets the scheduler.
    #[must_use]
    pub const fn with_scheduler(mut self, scheduler: UserId) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Sets the production category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the rejection notes.
    #[must_use]
    pub fn with_rejection_notes(mut self, notes: impl Into<String>) -> Self {
        self.rejection_notes = Some(notes.into());
        self
    }

    /// Returns `true` when the change set touches assignment fields.
    #[must_use]
    pub const fn has_assignment_changes(&self) -> bool {
        self.assigned_editor.is_some()
            || self.reviewer.is_some()
            || self.scheduler.is_some()
            || self.category.is_some()
    }
}

/// Result of applying a status transition to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The task was mutated.
    Applied {
        /// Status before the transition.
        from: TaskStatus,
        /// Status after the transition.
        to: TaskStatus,
    },
    /// The task already reflected the request; nothing was mutated.
    Unchanged,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    status: TaskStatus,
    category: TaskCategory,
    client_id: ClientId,
    created_by: UserId,
    assigned_editor: Option<UserId>,
    reviewer: Option<UserId>,
    scheduler: Option<UserId>,
    rejection_notes: Option<String>,
    version: TaskVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted production category.
    pub category: TaskCategory,
    /// Persisted client reference.
    pub client_id: ClientId,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted assigned editor, if any.
    pub assigned_editor: Option<UserId>,
    /// Persisted reviewer, if any.
    pub reviewer: Option<UserId>,
    /// Persisted scheduler, if any.
    pub scheduler: Option<UserId>,
    /// Persisted rejection notes, if any.
    pub rejection_notes: Option<String>,
    /// Persisted version.
    pub version: TaskVersion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Returns the status a transition actually persists.
///
/// A reviewer approving work for a client that requires its own review sends
/// the task to [`TaskStatus::ClientReview`] instead of completing it.
#[must_use]
pub const fn effective_target(
    role: ActorRole,
    target: TaskStatus,
    client_requires_review: bool,
) -> TaskStatus {
    match (role, target) {
        (ActorRole::Reviewer, TaskStatus::Completed) if client_requires_review => {
            TaskStatus::ClientReview
        }
        _ => target,
    }
}

impl Task {
    /// Creates a new pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        client_id: ClientId,
        category: TaskCategory,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            title: trimmed.to_owned(),
            status: TaskStatus::Pending,
            category,
            client_id,
            created_by,
            assigned_editor: None,
            reviewer: None,
            scheduler: None,
            rejection_notes: None,
            version: TaskVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Applies initial assignments to a task that has not been stored yet.
    ///
    /// Unlike [`Task::update_details`] this neither checks roles nor advances
    /// the version.
    #[must_use]
    pub fn with_initial_assignments(mut self, changes: &TaskFieldChanges) -> Self {
        self.apply_changes(changes);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            status: data.status,
            category: data.category,
            client_id: data.client_id,
            created_by: data.created_by,
            assigned_editor: data.assigned_editor,
            reviewer: data.reviewer,
            scheduler: data.scheduler,
            rejection_notes: data.rejection_notes,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the production category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the client reference.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the user that created the task.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assigned editor, if any.
    #[must_use]
    pub const fn assigned_editor(&self) -> Option<UserId> {
        self.assigned_editor
    }

    /// Returns the reviewer, if any.
    #[must_use]
    pub const fn reviewer(&self) -> Option<UserId> {
        self.reviewer
    }

    /// Returns the scheduler, if any.
    #[must_use]
    pub const fn scheduler(&self) -> Option<UserId> {
        self.scheduler
    }

    /// Returns the rejection notes, if any.
    #[must_use]
    pub fn rejection_notes(&self) -> Option<&str> {
        self.rejection_notes.as_deref()
    }

    /// Returns `true` when the task carries non-blank rejection notes.
    #[must_use]
    pub fn has_rejection_notes(&self) -> bool {
        self.rejection_notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty())
    }

    /// Returns the concurrency version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a role-gated status transition.
    ///
    /// Returns [`StatusChange::Unchanged`] without checking `expected` when
    /// the task already holds the effective target status and `changes`
    /// would not alter any field, so that retried requests are harmless.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TransitionForbidden`] when the role may not
    /// reach `target`, [`TaskDomainError::FieldChangeForbidden`] when the
    /// change set touches assignments or rejection notes the role may not
    /// change, and [`TaskDomainError::StaleVersion`] when `expected` is
    /// outdated.
    pub fn apply_transition(
        &mut self,
        actor: Actor,
        expected: TaskVersion,
        target: TaskStatus,
        changes: &TaskFieldChanges,
        client_requires_review: bool,
        clock: &impl Clock,
    ) -> Result<StatusChange, TaskDomainError> {
        if !actor.role.permits(target) {
            return Err(TaskDomainError::TransitionForbidden {
                task_id: self.id,
                role: actor.role,
                target,
            });
        }
        self.ensure_may_change(actor.role, changes)?;

        let to = effective_target(actor.role, target, client_requires_review);
        if to == self.status && !self.differs_from(changes) {
            return Ok(StatusChange::Unchanged);
        }
        self.ensure_version(expected)?;

        let from = self.status;
        self.status = to;
        self.apply_changes(changes);
        self.commit(clock);
        Ok(StatusChange::Applied { from, to })
    }

    /// Applies assignment and note changes without touching the status.
    ///
    /// Returns `false` when nothing would change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::FieldChangeForbidden`] when the role may not
    /// change assignments or the rejection notes, and
    /// [`TaskDomainError::StaleVersion`] when `expected` is outdated.
    pub fn update_details(
        &mut self,
        actor: Actor,
        expected: TaskVersion,
        changes: &TaskFieldChanges,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        if !actor.role.can_assign() {
            return Err(TaskDomainError::FieldChangeForbidden {
                task_id: self.id,
                role: actor.role,
            });
        }
        self.ensure_may_change(actor.role, changes)?;
        if !self.differs_from(changes) {
            return Ok(false);
        }
        self.ensure_version(expected)?;
        self.apply_changes(changes);
        self.commit(clock);
        Ok(true)
    }

    /// Stored rejection notes may be replaced but never cleared.
    fn ensure_may_change(
        &self,
        role: ActorRole,
        changes: &TaskFieldChanges,
    ) -> Result<(), TaskDomainError> {
        let assigns = changes.has_assignment_changes() && !role.can_assign();
        let annotates = changes.rejection_notes.as_deref().is_some_and(|notes| {
            !role.can_annotate_rejections()
                || (self.rejection_notes.is_some() && normalize_notes(notes).is_none())
        });
        if assigns || annotates {
            return Err(TaskDomainError::FieldChangeForbidden {
                task_id: self.id,
                role,
            });
        }
        Ok(())
    }

    fn ensure_version(&self, expected: TaskVersion) -> Result<(), TaskDomainError> {
        if expected != self.version {
            return Err(TaskDomainError::StaleVersion {
                task_id: self.id,
                expected,
                actual: self.version,
            });
        }
        Ok(())
    }

    fn differs_from(&self, changes: &TaskFieldChanges) -> bool {
        let differs = |new: Option<UserId>, current: Option<UserId>| {
            new.is_some_and(|value| Some(value) != current)
        };
        differs(changes.assigned_editor, self.assigned_editor)
            || differs(changes.reviewer, self.reviewer)
            || differs(changes.scheduler, self.scheduler)
            || changes
                .category
                .is_some_and(|category| category != self.category)
            || changes
                .rejection_notes
                .as_deref()
                .is_some_and(|notes| normalize_notes(notes).as_deref() != self.rejection_notes())
    }

    fn apply_changes(&mut self, changes: &TaskFieldChanges) {
        if let Some(editor) = changes.assigned_editor {
            self.assigned_editor = Some(editor);
        }
        if let Some(reviewer) = changes.reviewer {
            self.reviewer = Some(reviewer);
        }
        if let Some(scheduler) = changes.scheduler {
            self.scheduler = Some(scheduler);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(notes) = changes.rejection_notes.as_deref() {
            self.rejection_notes = normalize_notes(notes);
        }
    }

    /// Advances the version and timestamp after a mutation.
    ///
    /// `updated_at` never moves backwards, even if the clock does.
    fn commit(&mut self, clock: &impl Clock) {
        self.version = self.version.next();
        self.updated_at = self.updated_at.max(clock.utc());
    }
}

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
