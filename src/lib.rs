//! qcflow: task quality-control workflow and reviewer analytics.
//!
//! This crate provides the core of a creative-production review pipeline:
//! a role-gated task status lifecycle with versioned persistence and
//! best-effort side effects, and reviewer performance analytics derived from
//! the reviewed tasks.
//!
//! # Architecture
//!
//! qcflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores)
//!
//! # Modules
//!
//! - [`task`]: Status transitions, role rules, and side-effect delivery
//! - [`analytics`]: Review metrics, trends, rejection reasons, achievements
//! - [`config`]: TOML-loadable engine configuration
//! - [`clock`]: Settable clock for deterministic time

pub mod analytics;
pub mod clock;
pub mod config;
pub mod task;
