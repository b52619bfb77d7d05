//! Application services for the task workflow.

mod dispatcher;
mod retry;
mod workflow;

pub use dispatcher::SideEffectDispatcher;
pub use retry::RetryPolicy;
pub use workflow::{
    CreateTaskRequest, TaskWorkflowError, TaskWorkflowResult, TaskWorkflowService,
    TransitionTaskRequest, UpdateTaskDetailsRequest, WorkflowErrorKind,
};
