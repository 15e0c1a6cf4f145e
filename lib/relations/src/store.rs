//! Storage seam for the relationship registry.

use crate::error::RelationshipError;
use crate::types::{RelationEdge, RelationshipType};
use async_trait::async_trait;
use tether_core::{RelationshipTypeId, Result, UserId};

/// Persistent storage for relationship types and edges.
///
/// Each method is a single round trip. The registry composes them; the store
/// makes no attempt to make a lookup and the following write atomic.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Inserts a relationship type.
    async fn insert_type(&self, record: &RelationshipType) -> Result<(), RelationshipError>;

    /// Returns the earliest-created type matching (owner, name).
    async fn find_type(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<RelationshipType>, RelationshipError>;

    /// Lists all types owned by `owner` in creation order.
    async fn list_types(&self, owner: UserId) -> Result<Vec<RelationshipType>, RelationshipError>;

    /// Deletes every type matching (owner, name). Edges are left in place.
    ///
    /// Returns the number of deleted types.
    async fn delete_types(&self, owner: UserId, name: &str) -> Result<u64, RelationshipError>;

    /// Inserts an edge.
    async fn insert_edge(&self, edge: &RelationEdge) -> Result<(), RelationshipError>;

    /// Returns true if at least one edge connects the type to `target`.
    async fn edge_exists(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<bool, RelationshipError>;

    /// Deletes every edge connecting the type to `target`.
    ///
    /// Returns the number of deleted edges.
    async fn delete_edges(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<u64, RelationshipError>;

    /// Lists the edges of a type in creation order.
    async fn list_edges(
        &self,
        relationship_type: RelationshipTypeId,
    ) -> Result<Vec<RelationEdge>, RelationshipError>;
}
