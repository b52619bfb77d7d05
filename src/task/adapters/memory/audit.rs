//! In-memory append-only audit log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::AuditEntry,
    ports::{AuditSink, SideEffectError, SideEffectResult},
};

/// Thread-safe in-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded entry in append order.
    ///
    /// # Errors
    ///
    /// Returns [`SideEffectError::Audit`] when the lock is poisoned.
    pub fn entries(&self) -> SideEffectResult<Vec<AuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| SideEffectError::audit(std::io::Error::other(err.to_string())))?;
        Ok(entries.clone())
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> SideEffectResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| SideEffectError::audit(std::io::Error::other(err.to_string())))?;
        entries.push(entry.clone());
        Ok(())
    }
}
