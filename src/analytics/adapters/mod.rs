//! Adapter implementations for analytics ports.

pub mod memory;
