//! Port contracts for the task workflow.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod repository;
pub mod side_effects;

pub use directory::{ClientDirectory, ClientProfile, DirectoryError};
pub use repository::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use side_effects::{
    AuditSink, SideEffect, SideEffectError, SideEffectQueue, SideEffectResult, TaskListCache,
    task_list_key, task_list_pattern,
};
