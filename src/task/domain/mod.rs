//! Domain model for the task workflow.
//!
//! The task domain owns the status lifecycle, the static role rules that gate
//! it, and the audit records describing each mutation. Persistence, caching,
//! and delivery of side effects stay outside this boundary.

mod audit;
mod error;
mod ids;
mod role;
mod status;
mod task;

pub use audit::{AuditAction, AuditEntry};
pub use error::{ParseActorRoleError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ClientId, TaskId, TaskVersion, UserId};
pub use role::{Actor, ActorRole};
pub use status::{TaskCategory, TaskStatus};
pub use task::{PersistedTaskData, StatusChange, Task, TaskFieldChanges, effective_target};
