//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing without external infrastructure.

mod audit;
mod cache;
mod directory;
mod task;

pub use audit::InMemoryAuditLog;
pub use cache::InMemoryTaskListCache;
pub use directory::InMemoryClientDirectory;
pub use task::InMemoryTaskRepository;
