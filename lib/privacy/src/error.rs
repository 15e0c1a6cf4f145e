//! Privacy-attribute registry error types.

use std::fmt;
use tether_core::ObjectId;

/// Errors from privacy-attribute operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivacyError {
    /// The object has no attribute with this name.
    AttributeNotFound { object: ObjectId, name: String },
    /// The object already has an attribute with this name.
    ///
    /// Only raised when the registry enforces unique names.
    DuplicateAttribute { object: ObjectId, name: String },
    /// The backing store failed.
    StorageFailed { details: String },
}

impl PrivacyError {
    /// Creates a storage failure from any displayable error.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::StorageFailed {
            details: err.to_string(),
        }
    }

    /// Returns true if this error reports a missing attribute.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}

impl fmt::Display for PrivacyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeNotFound { object, name } => {
                write!(f, "privacy attribute '{name}' not found on {object}")
            }
            Self::DuplicateAttribute { object, name } => {
                write!(f, "{object} already has privacy attribute '{name}'")
            }
            Self::StorageFailed { details } => {
                write!(f, "privacy storage failed: {details}")
            }
        }
    }
}

impl std::error::Error for PrivacyError {}
