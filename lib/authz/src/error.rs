//! Authorization error types.

use std::fmt;
use tether_core::{ObjectId, UserId};

/// Authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Permission denied.
    PermissionDenied {
        /// The user who attempted the action.
        viewer: UserId,
        /// The object that was accessed.
        object: ObjectId,
        /// The action that was requested.
        action: String,
    },
    /// The protected object is unknown to the ownership lookup.
    ObjectNotFound {
        /// The object that was looked up.
        object: ObjectId,
    },
    /// The user handle could not be resolved.
    UserNotFound {
        /// The handle that was looked up.
        handle: String,
    },
    /// A registry or collaborator failed while evaluating a decision.
    LookupFailed {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for AuthzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied {
                viewer,
                object,
                action,
            } => write!(f, "user {viewer} may not '{action}' on object {object}"),
            Self::ObjectNotFound { object } => write!(f, "object {object} not found"),
            Self::UserNotFound { handle } => write!(f, "user '{handle}' not found"),
            Self::LookupFailed { details } => write!(f, "authorization lookup failed: {details}"),
        }
    }
}

impl std::error::Error for AuthzError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_names_viewer_action_and_object() {
        let (viewer, object) = (UserId::new(), ObjectId::new());
        let err = AuthzError::PermissionDenied {
            viewer,
            object,
            action: "reply".to_string(),
        };
        assert_eq!(
            err.to_string(),
            format!("user {viewer} may not 'reply' on object {object}")
        );
    }
}
