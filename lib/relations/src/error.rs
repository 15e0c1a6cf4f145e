//! Relationship registry error types.

use std::fmt;
use tether_core::UserId;

/// Errors from relationship registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    /// No relationship type with this name is owned by the user.
    RelationNotFound {
        /// The user expected to own the type.
        owner: UserId,
        /// The relationship name that was looked up.
        name: String,
    },
    /// The owner already has a relationship type with this name.
    ///
    /// Only raised when the registry enforces unique names.
    DuplicateRelation {
        /// The owner of the existing type.
        owner: UserId,
        /// The conflicting name.
        name: String,
    },
    /// The backing store failed.
    StorageFailed {
        /// Error details.
        details: String,
    },
}

impl RelationshipError {
    /// Creates a storage failure from any displayable error.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::StorageFailed {
            details: err.to_string(),
        }
    }
}

impl fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelationNotFound { owner, name } => {
                write!(f, "relationship '{name}' not found for user {owner}")
            }
            Self::DuplicateRelation { owner, name } => {
                write!(f, "user {owner} already defines relationship '{name}'")
            }
            Self::StorageFailed { details } => {
                write!(f, "relationship storage failed: {details}")
            }
        }
    }
}

impl std::error::Error for RelationshipError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_relation() {
        let err = RelationshipError::RelationNotFound {
            owner: UserId::new(),
            name: "friend".to_string(),
        };
        assert!(err.to_string().contains("'friend' not found"));
    }

    #[test]
    fn storage_helper_keeps_details() {
        let err = RelationshipError::storage("connection reset");
        assert_eq!(
            err,
            RelationshipError::StorageFailed {
                details: "connection reset".to_string()
            }
        );
    }
}
