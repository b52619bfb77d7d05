//! In-memory task-list cache with glob pattern deletes.

use async_trait::async_trait;
use glob::Pattern;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{SideEffectError, SideEffectResult, TaskListCache};

/// Thread-safe in-memory cache of task-list views.
///
/// Every pattern passed to [`TaskListCache::delete_matching`] is recorded so
/// tests can assert which invalidations were issued.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskListCache {
    state: Arc<RwLock<CacheState>>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Value>,
    issued_patterns: Vec<String>,
}

fn lock_error(err: impl std::fmt::Display) -> SideEffectError {
    SideEffectError::cache(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskListCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rendered view under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SideEffectError::Cache`] when the lock is poisoned.
    pub fn put(&self, key: impl Into<String>, value: Value) -> SideEffectResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.entries.insert(key.into(), value);
        Ok(())
    }

    /// Returns `true` when `key` is cached.
    ///
    /// # Errors
    ///
    /// Returns [`SideEffectError::Cache`] when the lock is poisoned.
    pub fn contains(&self, key: &str) -> SideEffectResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.entries.contains_key(key))
    }

    /// Returns every pattern deleted so far, in call order.
    ///
    /// # Errors
    ///
    /// Returns [`SideEffectError::Cache`] when the lock is poisoned.
    pub fn issued_patterns(&self) -> SideEffectResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.issued_patterns.clone())
    }
}

#[async_trait]
impl TaskListCache for InMemoryTaskListCache {
    async fn delete_matching(&self, pattern: &str) -> SideEffectResult<u64> {
        let matcher =
            Pattern::new(pattern).map_err(|_| SideEffectError::InvalidPattern(pattern.to_owned()))?;
        let mut state = self.state.write().map_err(lock_error)?;
        state.issued_patterns.push(pattern.to_owned());

        let before = state.entries.len();
        state.entries.retain(|key, _| !matcher.matches(key));
        let removed = before.saturating_sub(state.entries.len());
        u64::try_from(removed).map_err(SideEffectError::cache)
    }
}
