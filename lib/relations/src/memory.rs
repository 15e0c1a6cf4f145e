//! In-memory relationship store.

use crate::error::RelationshipError;
use crate::store::RelationshipStore;
use crate::types::{RelationEdge, RelationshipType};
use async_trait::async_trait;
use std::sync::Arc;
use tether_core::{RelationshipTypeId, Result, UserId};
use tokio::sync::RwLock;

/// A relationship store backed by in-process vectors.
///
/// Records are kept in insertion order, which is also creation order, so
/// "first match" lookups return the earliest-created duplicate. Used by tests
/// and by the server's `memory` storage backend.
#[derive(Debug, Default)]
pub struct InMemoryRelationshipStore {
    types: RwLock<Vec<RelationshipType>>,
    edges: RwLock<Vec<RelationEdge>>,
}

impl InMemoryRelationshipStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind an `Arc`, ready to hand to a registry.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the total number of edges, including orphaned ones.
    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }
}

#[async_trait]
impl RelationshipStore for InMemoryRelationshipStore {
    async fn insert_type(&self, record: &RelationshipType) -> Result<(), RelationshipError> {
        self.types.write().await.push(record.clone());
        Ok(())
    }

    async fn find_type(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<RelationshipType>, RelationshipError> {
        let types = self.types.read().await;
        Ok(types
            .iter()
            .find(|t| t.owner == owner && t.name == name)
            .cloned())
    }

    async fn list_types(&self, owner: UserId) -> Result<Vec<RelationshipType>, RelationshipError> {
        let types = self.types.read().await;
        Ok(types.iter().filter(|t| t.owner == owner).cloned().collect())
    }

    async fn delete_types(&self, owner: UserId, name: &str) -> Result<u64, RelationshipError> {
        let mut types = self.types.write().await;
        let before = types.len();
        types.retain(|t| !(t.owner == owner && t.name == name));
        Ok((before - types.len()) as u64)
    }

    async fn insert_edge(&self, edge: &RelationEdge) -> Result<(), RelationshipError> {
        self.edges.write().await.push(edge.clone());
        Ok(())
    }

    async fn edge_exists(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<bool, RelationshipError> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .any(|e| e.relationship_type == relationship_type && e.target == target))
    }

    async fn delete_edges(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<u64, RelationshipError> {
        let mut edges = self.edges.write().await;
        let before = edges.len();
        edges.retain(|e| !(e.relationship_type == relationship_type && e.target == target));
        Ok((before - edges.len()) as u64)
    }

    async fn list_edges(
        &self,
        relationship_type: RelationshipTypeId,
    ) -> Result<Vec<RelationEdge>, RelationshipError> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .filter(|e| e.relationship_type == relationship_type)
            .cloned()
            .collect())
    }
}
