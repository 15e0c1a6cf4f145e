//! HTTP-facing errors.
//!
//! Registry and checker reports are mapped to a status code and a user-safe
//! message. Internal details are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rootcause::Report;
use serde_json::json;
use std::fmt;
use tether_authz::AuthzError;
use tether_core::ParseIdError;
use tether_privacy::PrivacyError;
use tether_relations::RelationshipError;

/// Errors returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Referenced relationship, attribute, object or user does not exist.
    NotFound { what: String },
    /// The request carries no acting user.
    Unauthenticated,
    /// Authorization denied.
    Forbidden,
    /// Duplicate creation while unique names are enforced.
    Conflict { what: String },
    /// Malformed request input.
    BadRequest { reason: String },
    /// Storage or other internal failure.
    Internal { details: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { what } => write!(f, "{what} not found"),
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Conflict { what } => write!(f, "{what} already exists"),
            Self::BadRequest { reason } => write!(f, "bad request: {reason}"),
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message shown to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { details } = &self {
            tracing::error!(%details, "request failed");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        Self::BadRequest {
            reason: err.to_string(),
        }
    }
}

impl From<Report<RelationshipError>> for ApiError {
    fn from(report: Report<RelationshipError>) -> Self {
        match report.current_context() {
            RelationshipError::RelationNotFound { name, .. } => Self::NotFound {
                what: format!("relationship '{name}'"),
            },
            RelationshipError::DuplicateRelation { name, .. } => Self::Conflict {
                what: format!("relationship '{name}'"),
            },
            RelationshipError::StorageFailed { .. } => Self::Internal {
                details: format!("{report:?}"),
            },
        }
    }
}

impl From<Report<PrivacyError>> for ApiError {
    fn from(report: Report<PrivacyError>) -> Self {
        match report.current_context() {
            PrivacyError::AttributeNotFound { name, .. } => Self::NotFound {
                what: format!("privacy attribute '{name}'"),
            },
            PrivacyError::DuplicateAttribute { name, .. } => Self::Conflict {
                what: format!("privacy attribute '{name}'"),
            },
            PrivacyError::StorageFailed { .. } => Self::Internal {
                details: format!("{report:?}"),
            },
        }
    }
}

impl From<Report<AuthzError>> for ApiError {
    fn from(report: Report<AuthzError>) -> Self {
        match report.current_context() {
            AuthzError::PermissionDenied { .. } => Self::Forbidden,
            AuthzError::ObjectNotFound { object } => Self::NotFound {
                what: format!("object {object}"),
            },
            AuthzError::UserNotFound { handle } => Self::NotFound {
                what: format!("user '{handle}'"),
            },
            AuthzError::LookupFailed { .. } => Self::Internal {
                details: format!("{report:?}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::UserId;

    #[test]
    fn relation_not_found_maps_to_404() {
        let report: Report<RelationshipError> = RelationshipError::RelationNotFound {
            owner: UserId::new(),
            name: "friend".to_string(),
        }
        .into();
        let err = ApiError::from(report);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.public_message().contains("'friend'"));
    }

    #[test]
    fn internal_details_are_hidden() {
        let report: Report<PrivacyError> = PrivacyError::storage("password=hunter2").into();
        let err = ApiError::from(report);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("hunter2"));
    }
}
