//! Actor roles and the static status transition rules attached to them.

use super::{ParseActorRoleError, TaskStatus, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Full administrative access.
    Admin,
    /// Production manager with full workflow access.
    Manager,
    /// Plans and assigns work; cannot move status.
    Scheduler,
    /// Produces the work.
    Editor,
    /// Performs quality control.
    Reviewer,
    /// Client-side approver.
    Client,
}

const EDITOR_TARGETS: &[TaskStatus] = &[
    TaskStatus::InProgress,
    TaskStatus::ReadyForQc,
    TaskStatus::OnHold,
];

const REVIEWER_TARGETS: &[TaskStatus] = &[
    TaskStatus::QcInProgress,
    TaskStatus::Completed,
    TaskStatus::Rejected,
];

const CLIENT_TARGETS: &[TaskStatus] = &[
    TaskStatus::ClientReview,
    TaskStatus::Completed,
    TaskStatus::Rejected,
];

impl ActorRole {
    /// Every role.
    pub const ALL: [Self; 6] = [
        Self::Admin,
        Self::Manager,
        Self::Scheduler,
        Self::Editor,
        Self::Reviewer,
        Self::Client,
    ];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Scheduler => "scheduler",
            Self::Editor => "editor",
            Self::Reviewer => "reviewer",
            Self::Client => "client",
        }
    }

    /// Returns the statuses this role may move a task into.
    #[must_use]
    pub const fn permitted_targets(self) -> &'static [TaskStatus] {
        match self {
            Self::Admin | Self::Manager => &TaskStatus::ALL,
            Self::Scheduler => &[],
            Self::Editor => EDITOR_TARGETS,
            Self::Reviewer => REVIEWER_TARGETS,
            Self::Client => CLIENT_TARGETS,
        }
    }

    /// Returns `true` when this role may move a task into `target`.
    #[must_use]
    pub fn permits(self, target: TaskStatus) -> bool {
        self.permitted_targets().contains(&target)
    }

    /// Returns `true` when this role may change task assignments.
    #[must_use]
    pub const fn can_assign(self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Scheduler)
    }

    /// Returns `true` when this role may write rejection notes.
    #[must_use]
    pub const fn can_annotate_rejections(self) -> bool {
        matches!(
            self,
            Self::Admin | Self::Manager | Self::Reviewer | Self::Client
        )
    }

    /// Returns `true` when this role may create tasks.
    #[must_use]
    pub const fn can_create_tasks(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActorRole {
    type Error = ParseActorRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ParseActorRoleError(value.to_owned()))
    }
}

/// An externally verified identity acting on the workflow.
///
/// The core never resolves identity itself; callers pass an `Actor` into
/// every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// The role the user acts under.
    pub role: ActorRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: ActorRole) -> Self {
        Self { user_id, role }
    }
}
