//! Adapter implementations for the task workflow ports.
//!
//! Durable storage, caching and identity live outside this crate. The
//! in-memory adapters in [`memory`] implement every port faithfully enough to
//! drive the services in tests and embedded deployments.

pub mod memory;
