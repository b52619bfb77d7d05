//! Step definitions for reviewer performance scenarios.

mod given;
mod then;
pub mod world;
