//! Ownership of protected objects.
//!
//! Objects are registered by the user who owns them. The directory is the
//! server's [`ObjectOwnerLookup`]: permission checks and attribute changes
//! read the owner from here, never from the request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tether_authz::{AuthzError, ObjectOwnerLookup};
use tether_core::{ObjectId, Result, UserId};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// A protected object and the user who owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Object id.
    pub id: ObjectId,
    /// Owning user.
    pub owner: UserId,
    /// When the object was registered.
    pub created_at: DateTime<Utc>,
}

impl ObjectRecord {
    /// Creates a record for a fresh object owned by `owner`.
    pub fn new(owner: UserId) -> Self {
        Self {
            id: ObjectId::new(),
            owner,
            created_at: Utc::now(),
        }
    }
}

/// Storage for object ownership.
///
/// Storage failures are reported as [`AuthzError::LookupFailed`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores a new object record.
    async fn insert_object(&self, record: &ObjectRecord) -> Result<(), AuthzError>;

    /// Returns the object's record, if registered.
    async fn find_object(&self, object: ObjectId) -> Result<Option<ObjectRecord>, AuthzError>;
}

/// Object ownership kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, ObjectRecord>>,
}

impl InMemoryObjectStore {
    /// Creates an empty store behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn insert_object(&self, record: &ObjectRecord) -> Result<(), AuthzError> {
        self.objects.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_object(&self, object: ObjectId) -> Result<Option<ObjectRecord>, AuthzError> {
        Ok(self.objects.read().await.get(&object).cloned())
    }
}

/// Registers objects and answers ownership lookups.
#[derive(Clone)]
pub struct ObjectDirectory {
    store: Arc<dyn ObjectStore>,
}

impl ObjectDirectory {
    /// Creates a directory over the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Registers a new object owned by `owner`.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn register(&self, owner: UserId) -> Result<ObjectRecord, AuthzError> {
        let record = ObjectRecord::new(owner);
        self.store.insert_object(&record).await?;
        debug!(object = %record.id, "registered object");
        Ok(record)
    }

    /// Returns the object's record, or [`AuthzError::ObjectNotFound`].
    pub async fn get(&self, object: ObjectId) -> Result<ObjectRecord, AuthzError> {
        self.store
            .find_object(object)
            .await?
            .ok_or_else(|| AuthzError::ObjectNotFound { object }.into())
    }

    /// Fails with [`AuthzError::PermissionDenied`] unless `user` owns `object`.
    ///
    /// `action` names the attempted change in the denial.
    pub async fn require_owner(
        &self,
        user: UserId,
        object: ObjectId,
        action: &str,
    ) -> Result<(), AuthzError> {
        let record = self.get(object).await?;
        if record.owner != user {
            debug!(%user, %object, "caller does not own object");
            return Err(AuthzError::PermissionDenied {
                viewer: user,
                object,
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectOwnerLookup for ObjectDirectory {
    async fn owner_of(&self, object: ObjectId) -> Result<UserId, AuthzError> {
        Ok(self.get(object).await?.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ObjectDirectory {
        ObjectDirectory::new(InMemoryObjectStore::shared())
    }

    #[tokio::test]
    async fn registered_object_reports_its_owner() {
        let objects = directory();
        let alice = UserId::new();

        let record = objects.register(alice).await.unwrap();

        assert_eq!(objects.owner_of(record.id).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn unknown_object_is_not_found() {
        let object = ObjectId::new();
        let err = directory().owner_of(object).await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            AuthzError::ObjectNotFound { object: o } if *o == object
        ));
    }

    #[tokio::test]
    async fn only_the_owner_passes_require_owner() {
        let objects = directory();
        let (alice, carol) = (UserId::new(), UserId::new());
        let post = objects.register(alice).await.unwrap().id;

        objects.require_owner(alice, post, "edit").await.unwrap();
        let err = objects.require_owner(carol, post, "edit").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            AuthzError::PermissionDenied { viewer, .. } if *viewer == carol
        ));
    }
}
