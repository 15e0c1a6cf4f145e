//! Relationship records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::{RelationEdgeId, RelationshipTypeId, UserId};

/// A named, directed category of connection defined by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipType {
    /// Unique identifier.
    pub id: RelationshipTypeId,
    /// The user who defined this type.
    pub owner: UserId,
    /// The relationship name, compared case-sensitively.
    pub name: String,
    /// When the type was created.
    pub created_at: DateTime<Utc>,
}

impl RelationshipType {
    /// Creates a new relationship type record.
    #[must_use]
    pub fn new(owner: UserId, name: impl Into<String>) -> Self {
        Self {
            id: RelationshipTypeId::new(),
            owner,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// One instance of a relationship type pointing at a target user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Unique identifier.
    pub id: RelationEdgeId,
    /// The relationship type this edge belongs to.
    pub relationship_type: RelationshipTypeId,
    /// The user on the receiving end of the relationship.
    pub target: UserId,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

impl RelationEdge {
    /// Creates a new edge record.
    #[must_use]
    pub fn new(relationship_type: RelationshipTypeId, target: UserId) -> Self {
        Self {
            id: RelationEdgeId::new(),
            relationship_type,
            target,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_type_has_owner_and_name() {
        let owner = UserId::new();
        let rel = RelationshipType::new(owner, "friend");
        assert_eq!(rel.owner, owner);
        assert_eq!(rel.name, "friend");
    }

    #[test]
    fn edge_serialization_roundtrip() {
        let edge = RelationEdge::new(RelationshipTypeId::new(), UserId::new());
        let json = serde_json::to_string(&edge).expect("serialize");
        let parsed: RelationEdge = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(edge, parsed);
    }
}
