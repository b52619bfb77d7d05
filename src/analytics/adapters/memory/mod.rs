//! In-memory adapter implementations for testing.
//!
//! These adapters keep derived analytics records in process memory and are
//! suitable for tests and single-process embedding.

mod reviewers;
mod store;

pub use reviewers::InMemoryReviewerDirectory;
pub use store::InMemoryAnalyticsStore;
