//! Collaborators the checker consumes but does not own.

use crate::error::AuthzError;
use async_trait::async_trait;
use tether_core::{ObjectId, Result, UserId};

/// Resolves a user-facing handle (such as a username) to a stable user id.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fails with [`AuthzError::UserNotFound`] for unknown handles.
    async fn resolve(&self, handle: &str) -> Result<UserId, AuthzError>;
}

/// Finds the owner of a protected object.
#[async_trait]
pub trait ObjectOwnerLookup: Send + Sync {
    /// Fails with [`AuthzError::ObjectNotFound`] for unknown objects.
    async fn owner_of(&self, object: ObjectId) -> Result<UserId, AuthzError>;
}
