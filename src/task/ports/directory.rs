//! Client directory port.
//!
//! Client records are plain CRUD owned elsewhere; the workflow only needs the
//! review policy and the contact user of a client.

use crate::task::domain::{ClientId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// The slice of a client record the workflow depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientProfile {
    /// Client identifier.
    pub id: ClientId,
    /// Whether approved work must pass the client's own review.
    pub requires_client_review: bool,
    /// User acting as the client's contact, if any.
    pub contact_user_id: Option<UserId>,
}

impl ClientProfile {
    /// Creates a profile with no contact user.
    #[must_use]
    pub const fn new(id: ClientId, requires_client_review: bool) -> Self {
        Self {
            id,
            requires_client_review,
            contact_user_id: None,
        }
    }

    /// Sets the contact user.
    #[must_use]
    pub const fn with_contact(mut self, contact: UserId) -> Self {
        self.contact_user_id = Some(contact);
        self
    }
}

/// Lookup contract for client profiles.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Finds a client profile.
    ///
    /// Returns `None` when the client is unknown.
    async fn find_client(&self, id: ClientId) -> Result<Option<ClientProfile>, DirectoryError>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory could not be reached.
    #[error("directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a lookup failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
