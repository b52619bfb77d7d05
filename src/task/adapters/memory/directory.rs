//! In-memory client directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::ClientId,
    ports::{ClientDirectory, ClientProfile, DirectoryError},
};

/// Thread-safe in-memory client directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientDirectory {
    clients: Arc<RwLock<HashMap<ClientId, ClientProfile>>>,
}

impl InMemoryClientDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a client profile.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the lock is poisoned.
    pub fn insert(&self, profile: ClientProfile) -> Result<(), DirectoryError> {
        let mut clients = self
            .clients
            .write()
            .map_err(|err| DirectoryError::unavailable(std::io::Error::other(err.to_string())))?;
        clients.insert(profile.id, profile);
        Ok(())
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn find_client(&self, id: ClientId) -> Result<Option<ClientProfile>, DirectoryError> {
        let clients = self
            .clients
            .read()
            .map_err(|err| DirectoryError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(clients.get(&id).copied())
    }
}
