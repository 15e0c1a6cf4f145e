//! The relationship registry.

use crate::error::RelationshipError;
use crate::store::RelationshipStore;
use crate::types::{RelationEdge, RelationshipType};
use std::sync::Arc;
use tether_core::{Result, UserId};
use tracing::{debug, instrument};

/// Registry of user-defined relationship types and their edges.
///
/// Cheap to clone; clones share the same store. Mutations that need a type
/// resolve it first and write second, in two separate store calls. A type
/// deleted between the two calls leaves an orphaned edge behind, which no read
/// will ever surface because reads always go through a live type id.
#[derive(Clone)]
pub struct RelationshipRegistry {
    store: Arc<dyn RelationshipStore>,
    unique_names: bool,
}

impl RelationshipRegistry {
    /// Creates a registry that tolerates duplicate relationship names.
    pub fn new(store: Arc<dyn RelationshipStore>) -> Self {
        Self {
            store,
            unique_names: false,
        }
    }

    /// Enables or disables rejecting a second type with the same (owner, name).
    ///
    /// The check is a lookup followed by an insert, so two concurrent creates
    /// can still both succeed.
    #[must_use]
    pub fn with_unique_names(mut self, unique_names: bool) -> Self {
        self.unique_names = unique_names;
        self
    }

    /// Defines a new relationship type owned by `owner`.
    #[instrument(skip(self, name), fields(owner = %owner, relation = name))]
    pub async fn create_type(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<RelationshipType, RelationshipError> {
        if self.unique_names && self.store.find_type(owner, name).await?.is_some() {
            return Err(RelationshipError::DuplicateRelation {
                owner,
                name: name.to_string(),
            }
            .into());
        }

        let record = RelationshipType::new(owner, name);
        self.store.insert_type(&record).await?;

        debug!(id = %record.id, "relationship type created");
        Ok(record)
    }

    /// Connects `target` to the owner's relationship type `name`.
    ///
    /// Not idempotent: relating twice stores two edges.
    #[instrument(skip(self, target, name), fields(owner = %owner, to = %target, relation = name))]
    pub async fn relate(
        &self,
        owner: UserId,
        target: UserId,
        name: &str,
    ) -> Result<(), RelationshipError> {
        let relation = self.resolve(owner, name).await?;
        let edge = RelationEdge::new(relation.id, target);
        self.store.insert_edge(&edge).await?;

        debug!(edge = %edge.id, "users related");
        Ok(())
    }

    /// Removes every edge from the owner's type `name` to `target`.
    ///
    /// Returns the number of removed edges.
    #[instrument(skip(self, target, name), fields(owner = %owner, to = %target, relation = name))]
    pub async fn unrelate(
        &self,
        owner: UserId,
        target: UserId,
        name: &str,
    ) -> Result<u64, RelationshipError> {
        let relation = self.resolve(owner, name).await?;
        let removed = self.store.delete_edges(relation.id, target).await?;

        debug!(removed, "users unrelated");
        Ok(removed)
    }

    /// Deletes every type named `name` owned by `owner`.
    ///
    /// Edges of the deleted types are not removed. Returns the number of
    /// deleted types; deleting an unknown name is not an error.
    #[instrument(skip(self, name), fields(owner = %owner, relation = name))]
    pub async fn delete_type(&self, owner: UserId, name: &str) -> Result<u64, RelationshipError> {
        let removed = self.store.delete_types(owner, name).await?;

        debug!(removed, "relationship types deleted");
        Ok(removed)
    }

    /// Lists every relationship type defined by `owner`.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn types_of(&self, owner: UserId) -> Result<Vec<RelationshipType>, RelationshipError> {
        self.store.list_types(owner).await
    }

    /// Returns the names of the owner's types that have an edge to `viewer`.
    ///
    /// A type with no edge to the viewer is never included. Duplicate types
    /// sharing a name each contribute their name when they have an edge.
    #[instrument(skip(self), fields(owner = %owner, viewer = %viewer))]
    pub async fn shared_relation_names(
        &self,
        owner: UserId,
        viewer: UserId,
    ) -> Result<Vec<String>, RelationshipError> {
        let mut shared = Vec::new();
        for relation in self.store.list_types(owner).await? {
            if self.store.edge_exists(relation.id, viewer).await? {
                shared.push(relation.name);
            }
        }

        debug!(count = shared.len(), "shared relations resolved");
        Ok(shared)
    }

    /// Lists the targets of the owner's relationship type `name`.
    #[instrument(skip(self, name), fields(owner = %owner, relation = name))]
    pub async fn targets_of_type(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Vec<UserId>, RelationshipError> {
        let relation = self.resolve(owner, name).await?;
        let edges = self.store.list_edges(relation.id).await?;
        Ok(edges.into_iter().map(|e| e.target).collect())
    }

    async fn resolve(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<RelationshipType, RelationshipError> {
        match self.store.find_type(owner, name).await? {
            Some(relation) => Ok(relation),
            None => Err(RelationshipError::RelationNotFound {
                owner,
                name: name.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRelationshipStore;

    fn registry() -> (RelationshipRegistry, Arc<InMemoryRelationshipStore>) {
        let store = InMemoryRelationshipStore::shared();
        (RelationshipRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn created_type_is_listed() {
        let (registry, _) = registry();
        let alice = UserId::new();

        registry.create_type(alice, "friend").await.unwrap();

        let types = registry.types_of(alice).await.unwrap();
        assert!(types.iter().any(|t| t.name == "friend"));
        assert!(registry.types_of(UserId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_names_are_kept_by_default() {
        let (registry, _) = registry();
        let alice = UserId::new();

        registry.create_type(alice, "friend").await.unwrap();
        registry.create_type(alice, "friend").await.unwrap();

        assert_eq!(registry.types_of(alice).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_when_unique() {
        let (registry, _) = registry();
        let registry = registry.with_unique_names(true);
        let alice = UserId::new();

        registry.create_type(alice, "friend").await.unwrap();
        let err = registry.create_type(alice, "friend").await.unwrap_err();

        assert!(matches!(
            err.current_context(),
            RelationshipError::DuplicateRelation { .. }
        ));
        // Another owner may still use the name
        registry.create_type(UserId::new(), "friend").await.unwrap();
    }

    #[tokio::test]
    async fn relate_unknown_type_is_not_found() {
        let (registry, _) = registry();
        let err = registry
            .relate(UserId::new(), UserId::new(), "friend")
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            RelationshipError::RelationNotFound { name, .. } if name == "friend"
        ));
    }

    #[tokio::test]
    async fn relate_then_unrelate_leaves_no_edge() {
        let (registry, _) = registry();
        let (alice, bob) = (UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();

        registry.relate(alice, bob, "friend").await.unwrap();
        assert_eq!(registry.unrelate(alice, bob, "friend").await.unwrap(), 1);

        assert!(registry.targets_of_type(alice, "friend").await.unwrap().is_empty());
        assert!(
            registry
                .shared_relation_names(alice, bob)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unrelate_removes_repeated_edges() {
        let (registry, _) = registry();
        let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();

        registry.relate(alice, bob, "friend").await.unwrap();
        registry.relate(alice, bob, "friend").await.unwrap();
        registry.relate(alice, carol, "friend").await.unwrap();

        assert_eq!(registry.unrelate(alice, bob, "friend").await.unwrap(), 2);
        assert_eq!(
            registry.targets_of_type(alice, "friend").await.unwrap(),
            vec![carol]
        );
    }

    #[tokio::test]
    async fn unrelate_unknown_type_is_not_found() {
        let (registry, _) = registry();
        let err = registry
            .unrelate(UserId::new(), UserId::new(), "friend")
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            RelationshipError::RelationNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn shared_names_require_an_edge_to_the_viewer() {
        let (registry, _) = registry();
        let (alice, bob) = (UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();
        registry.create_type(alice, "coworker").await.unwrap();
        registry.create_type(alice, "family").await.unwrap();
        registry.relate(alice, bob, "coworker").await.unwrap();

        let shared = registry.shared_relation_names(alice, bob).await.unwrap();

        assert_eq!(shared, vec!["coworker".to_string()]);
    }

    #[tokio::test]
    async fn shared_names_empty_for_unrelated_viewer() {
        let (registry, _) = registry();
        let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();
        registry.relate(alice, bob, "friend").await.unwrap();

        assert!(
            registry
                .shared_relation_names(alice, carol)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn relationships_are_directed() {
        let (registry, _) = registry();
        let (alice, bob) = (UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();
        registry.relate(alice, bob, "friend").await.unwrap();

        assert!(
            registry
                .shared_relation_names(bob, alice)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn targets_of_unknown_type_is_not_found() {
        let (registry, _) = registry();
        let err = registry
            .targets_of_type(UserId::new(), "friend")
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            RelationshipError::RelationNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_type_orphans_edges_without_exposing_them() {
        let (registry, store) = registry();
        let (alice, bob) = (UserId::new(), UserId::new());
        registry.create_type(alice, "friend").await.unwrap();
        registry.relate(alice, bob, "friend").await.unwrap();

        assert_eq!(registry.delete_type(alice, "friend").await.unwrap(), 1);
        assert_eq!(store.edge_count().await, 1);

        // A re-created type starts without the old edges
        registry.create_type(alice, "friend").await.unwrap();
        assert!(registry.targets_of_type(alice, "friend").await.unwrap().is_empty());
        assert!(
            registry
                .shared_relation_names(alice, bob)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn delete_unknown_type_removes_nothing() {
        let (registry, _) = registry();
        assert_eq!(registry.delete_type(UserId::new(), "friend").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn relate_uses_first_of_duplicate_types() {
        let (registry, _) = registry();
        let (alice, bob) = (UserId::new(), UserId::new());
        let first = registry.create_type(alice, "friend").await.unwrap();
        registry.create_type(alice, "friend").await.unwrap();

        registry.relate(alice, bob, "friend").await.unwrap();

        let types = registry.types_of(alice).await.unwrap();
        assert_eq!(types[0].id, first.id);
        // Only the first duplicate carries the edge, so the name appears once
        assert_eq!(
            registry.shared_relation_names(alice, bob).await.unwrap(),
            vec!["friend".to_string()]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_relates_all_land() {
        let (registry, store) = registry();
        let alice = UserId::new();
        registry.create_type(alice, "follower").await.unwrap();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.relate(alice, UserId::new(), "follower").await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("task").expect("relate");
        }

        assert_eq!(store.edge_count().await, 32);
        assert_eq!(registry.targets_of_type(alice, "follower").await.unwrap().len(), 32);
    }
}
