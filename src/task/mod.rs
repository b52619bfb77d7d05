//! Task workflow for qcflow.
//!
//! This module owns the task status lifecycle: the static role rules that
//! decide who may move a task where, the client-review override, versioned
//! persistence through the task store, and the best-effort side effects
//! (cache invalidation and auditing) that follow every persisted mutation.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
