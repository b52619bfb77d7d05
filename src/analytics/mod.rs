//! Reviewer performance analytics for qcflow.
//!
//! Analytics read reviewed tasks from the task store and derive rolling
//! metrics, monthly snapshots, rejection reason tallies, and achievements.
//! Derived records are refreshed lazily whenever a report is requested. The
//! module follows hexagonal architecture:
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
