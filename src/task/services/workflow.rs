//! Workflow engine: role-gated task mutations and their side effects.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::task::{
    domain::{
        Actor, ActorRole, AuditEntry, ClientId, StatusChange, Task, TaskCategory, TaskDomainError,
        TaskFieldChanges, TaskId, TaskStatus, TaskVersion, UserId,
    },
    ports::{
        ClientDirectory, ClientProfile, DirectoryError, SideEffect, SideEffectQueue,
        TaskRepository, TaskRepositoryError,
    },
};

/// Request payload for moving a task to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    expected_version: TaskVersion,
    status: String,
    changes: TaskFieldChanges,
}

impl TransitionTaskRequest {
    /// Creates a request for the given task, version the caller last read,
    /// and target status string.
    #[must_use]
    pub fn new(task_id: TaskId, expected_version: TaskVersion, status: impl Into<String>) -> Self {
        Self {
            task_id,
            expected_version,
            status: status.into(),
            changes: TaskFieldChanges::default(),
        }
    }

    /// Sets optional field updates applied with the transition.
    #[must_use]
    pub fn with_changes(mut self, changes: TaskFieldChanges) -> Self {
        self.changes = changes;
        self
    }

    /// Sets rejection notes applied with the transition.
    #[must_use]
    pub fn with_rejection_notes(mut self, notes: impl Into<String>) -> Self {
        self.changes.rejection_notes = Some(notes.into());
        self
    }
}

/// Request payload for changing task assignments without a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskDetailsRequest {
    task_id: TaskId,
    expected_version: TaskVersion,
    changes: TaskFieldChanges,
}

impl UpdateTaskDetailsRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        expected_version: TaskVersion,
        changes: TaskFieldChanges,
    ) -> Self {
        Self {
            task_id,
            expected_version,
            changes,
        }
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    client_id: ClientId,
    category: TaskCategory,
    assignments: TaskFieldChanges,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(title: impl Into<String>, client_id: ClientId, category: TaskCategory) -> Self {
        Self {
            title: title.into(),
            client_id,
            category,
            assignments: TaskFieldChanges::default(),
        }
    }

    /// Assigns an editor.
    #[must_use]
    pub const fn with_editor(mut self, editor: UserId) -> Self {
        self.assignments.assigned_editor = Some(editor);
        self
    }

    /// Assigns a reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer: UserId) -> Self {
        self.assignments.reviewer = Some(reviewer);
        self
    }

    /// Assigns a scheduler.
    #[must_use]
    pub const fn with_scheduler(mut self, scheduler: UserId) -> Self {
        self.assignments.scheduler = Some(scheduler);
        self
    }
}

/// Coarse classification of workflow failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// The actor's role may not perform the request.
    Forbidden,
    /// The task does not exist.
    NotFound,
    /// The request is malformed.
    Validation,
    /// The caller's version is stale.
    Conflict,
    /// A collaborator could not be reached.
    Upstream,
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// The actor's role may not perform the request.
    #[error("forbidden: {0}")]
    Forbidden(TaskDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The request is malformed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The caller's version no longer matches the stored task.
    #[error("task {task_id} changed concurrently: expected {expected}, now {actual}")]
    Conflict {
        /// Task being mutated.
        task_id: TaskId,
        /// Version supplied by the caller.
        expected: TaskVersion,
        /// Version currently stored.
        actual: TaskVersion,
    },

    /// The task store failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),

    /// The client directory failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl TaskWorkflowError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Forbidden(_) => WorkflowErrorKind::Forbidden,
            Self::NotFound(_) => WorkflowErrorKind::NotFound,
            Self::Validation(_) => WorkflowErrorKind::Validation,
            Self::Conflict { .. } => WorkflowErrorKind::Conflict,
            Self::Repository(_) | Self::Directory(_) => WorkflowErrorKind::Upstream,
        }
    }
}

impl From<TaskDomainError> for TaskWorkflowError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::StaleVersion {
                task_id,
                expected,
                actual,
            } => Self::Conflict {
                task_id,
                expected,
                actual,
            },
            TaskDomainError::EmptyTitle => Self::Validation(err.to_string()),
            TaskDomainError::TransitionForbidden { .. }
            | TaskDomainError::FieldChangeForbidden { .. }
            | TaskDomainError::CreationForbidden(_) => Self::Forbidden(err),
        }
    }
}

impl From<TaskRepositoryError> for TaskWorkflowError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::NotFound(task_id),
            TaskRepositoryError::VersionConflict {
                task_id,
                expected,
                actual,
            } => Self::Conflict {
                task_id,
                expected,
                actual,
            },
            other @ (TaskRepositoryError::DuplicateTask(_)
            | TaskRepositoryError::Persistence(_)) => Self::Repository(other),
        }
    }
}

/// Result type for workflow service operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Workflow orchestration service.
///
/// Every mutation is a single read-modify-write guarded by the task version.
/// Cache invalidation and auditing are handed to the side-effect queue after
/// the write succeeds and never affect the returned result.
#[derive(Clone)]
pub struct TaskWorkflowService<R, D, Q, C>
where
    R: TaskRepository,
    D: ClientDirectory,
    Q: SideEffectQueue,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clients: Arc<D>,
    side_effects: Arc<Q>,
    clock: Arc<C>,
}

impl<R, D, Q, C> TaskWorkflowService<R, D, Q, C>
where
    R: TaskRepository,
    D: ClientDirectory,
    Q: SideEffectQueue,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        clients: Arc<D>,
        side_effects: Arc<Q>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            clients,
            side_effects,
            clock,
        }
    }

    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] unless the actor is an admin
    /// or manager, [`TaskWorkflowError::Validation`] for a blank title, and
    /// [`TaskWorkflowError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: Actor,
        request: CreateTaskRequest,
    ) -> TaskWorkflowResult<Task> {
        if !actor.role.can_create_tasks() {
            return Err(TaskDomainError::CreationForbidden(actor.role).into());
        }
        let CreateTaskRequest {
            title,
            client_id,
            category,
            assignments,
        } = request;

        let task = Task::new(title, client_id, category, actor.user_id, &*self.clock)?
            .with_initial_assignments(&assignments);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), actor = %actor.user_id, "task created");

        self.publish(
            actor,
            &task,
            AuditEntry::task_created(actor, &task),
            ClientLookup::NotFetched,
        )
        .await;
        Ok(task)
    }

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] when the task does not exist.
    pub async fn find_task(&self, id: TaskId) -> TaskWorkflowResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskWorkflowError::NotFound(id))
    }

    /// Applies a role-gated status transition.
    ///
    /// A reviewer completing work for a client that requires its own review
    /// moves the task to `CLIENT_REVIEW` instead. Re-applying a transition
    /// the task already reflects returns the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Validation`] for a missing or unknown
    /// status, [`TaskWorkflowError::NotFound`] for an unknown task,
    /// [`TaskWorkflowError::Forbidden`] when the role may not reach the
    /// status or change the given fields, [`TaskWorkflowError::Conflict`] for
    /// a stale version, and upstream errors when the store or directory
    /// fails.
    pub async fn apply_transition(
        &self,
        actor: Actor,
        request: TransitionTaskRequest,
    ) -> TaskWorkflowResult<Task> {
        let TransitionTaskRequest {
            task_id,
            expected_version,
            status,
            changes,
        } = request;
        let target = parse_status(&status)?;

        let mut task = self.find_task(task_id).await?;
        let lookup = self.client_policy(&task, actor, target).await?;
        let prior_version = task.version();

        let change = task.apply_transition(
            actor,
            expected_version,
            target,
            &changes,
            lookup.requires_client_review(),
            &*self.clock,
        )?;
        let StatusChange::Applied { from, to } = change else {
            debug!(%task_id, status = %task.status(), "transition already applied");
            return Ok(task);
        };

        self.repository.update(&task, prior_version).await?;
        info!(
            %task_id,
            actor = %actor.user_id,
            role = %actor.role,
            %from,
            %to,
            version = %task.version(),
            "task transition applied"
        );

        self.publish(
            actor,
            &task,
            AuditEntry::status_changed(actor, &task, from, target),
            lookup,
        )
        .await;
        Ok(task)
    }

    /// Changes assignments without touching the status.
    ///
    /// This is the only mutation open to schedulers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] unless the actor may assign
    /// work, [`TaskWorkflowError::NotFound`] for an unknown task,
    /// [`TaskWorkflowError::Conflict`] for a stale version, and upstream
    /// errors when the store fails.
    pub async fn update_details(
        &self,
        actor: Actor,
        request: UpdateTaskDetailsRequest,
    ) -> TaskWorkflowResult<Task> {
        let UpdateTaskDetailsRequest {
            task_id,
            expected_version,
            changes,
        } = request;

        let mut task = self.find_task(task_id).await?;
        let prior_version = task.version();
        if !task.update_details(actor, expected_version, &changes, &*self.clock)? {
            debug!(%task_id, "detail update changes nothing");
            return Ok(task);
        }

        self.repository.update(&task, prior_version).await?;
        info!(
            %task_id,
            actor = %actor.user_id,
            version = %task.version(),
            "task details updated"
        );

        self.publish(
            actor,
            &task,
            AuditEntry::details_updated(actor, &task),
            ClientLookup::NotFetched,
        )
        .await;
        Ok(task)
    }

    /// Fetches the client profile when the review policy depends on it.
    async fn client_policy(
        &self,
        task: &Task,
        actor: Actor,
        target: TaskStatus,
    ) -> TaskWorkflowResult<ClientLookup> {
        if actor.role != ActorRole::Reviewer || target != TaskStatus::Completed {
            return Ok(ClientLookup::NotFetched);
        }
        let profile = self.clients.find_client(task.client_id()).await?;
        Ok(ClientLookup::Fetched(profile))
    }

    /// Queues cache invalidation for every affected user and the audit entry.
    ///
    /// The client directory is only consulted when `lookup` has not already
    /// fetched the profile.
    async fn publish(&self, actor: Actor, task: &Task, entry: AuditEntry, lookup: ClientLookup) {
        let profile = match lookup {
            ClientLookup::Fetched(profile) => profile,
            ClientLookup::NotFetched => match self.clients.find_client(task.client_id()).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!(task_id = %task.id(), error = %err, "client contact lookup failed");
                    None
                }
            },
        };
        let contact = profile.and_then(|client| client.contact_user_id);

        let affected: BTreeSet<UserId> = [
            Some(actor.user_id),
            task.assigned_editor(),
            task.reviewer(),
            task.scheduler(),
            contact,
            Some(task.created_by()),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.side_effects
            .enqueue(SideEffect::InvalidateTaskLists(affected.into_iter().collect()));
        self.side_effects.enqueue(SideEffect::Audit(entry));
    }
}

/// Client directory result carried through a single mutation.
#[derive(Debug, Clone, Copy)]
enum ClientLookup {
    NotFetched,
    Fetched(Option<ClientProfile>),
}

impl ClientLookup {
    const fn requires_client_review(self) -> bool {
        matches!(self, Self::Fetched(Some(profile)) if profile.requires_client_review)
    }
}

fn parse_status(raw: &str) -> TaskWorkflowResult<TaskStatus> {
    if raw.trim().is_empty() {
        return Err(TaskWorkflowError::Validation(
            "target status is required".to_owned(),
        ));
    }
    TaskStatus::try_from(raw).map_err(|err| TaskWorkflowError::Validation(err.to_string()))
}
