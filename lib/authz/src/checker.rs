//! The authorization checker.

use crate::collaborator::ObjectOwnerLookup;
use crate::error::AuthzError;
use tether_core::{ObjectId, Result, UserId};
use tether_privacy::PrivacyRegistry;
use tether_relations::RelationshipRegistry;
use tracing::{debug, instrument};

/// Evaluates access decisions against the two registries.
///
/// Holds no state of its own beyond handles to the registries.
#[derive(Clone)]
pub struct AuthzChecker {
    relations: RelationshipRegistry,
    privacy: PrivacyRegistry,
}

impl AuthzChecker {
    /// Creates a checker over the given registries.
    pub fn new(relations: RelationshipRegistry, privacy: PrivacyRegistry) -> Self {
        Self { relations, privacy }
    }

    /// Returns whether `viewer` may perform `action` on `object`, owned by `owner`.
    ///
    /// The viewer is allowed when one of the owner's relationship names that
    /// points at the viewer is a permitted value of the object's attribute
    /// named `action`. An object without that attribute denies. The owner gets
    /// no implicit access to their own objects.
    #[instrument(skip(self, action), fields(viewer = %viewer, owner = %owner, object = %object, action = action))]
    pub async fn is_permitted(
        &self,
        viewer: UserId,
        owner: UserId,
        object: ObjectId,
        action: &str,
    ) -> Result<bool, AuthzError> {
        let names = self
            .relations
            .shared_relation_names(owner, viewer)
            .await
            .map_err(|report| {
                let details = report.current_context().to_string();
                report.context(AuthzError::LookupFailed { details })
            })?;

        let allowed = match self.privacy.any_value_satisfies(object, action, &names).await {
            Ok(allowed) => allowed,
            Err(report) if report.current_context().is_not_found() => {
                debug!("action has no privacy attribute, denying");
                false
            }
            Err(report) => {
                let details = report.current_context().to_string();
                return Err(report.context(AuthzError::LookupFailed { details }));
            }
        };

        debug!(allowed, "permission check result");
        Ok(allowed)
    }

    /// Checks permission and returns [`AuthzError::PermissionDenied`] if denied.
    pub async fn check_permission(
        &self,
        viewer: UserId,
        owner: UserId,
        object: ObjectId,
        action: &str,
    ) -> Result<(), AuthzError> {
        if !self.is_permitted(viewer, owner, object, action).await? {
            return Err(AuthzError::PermissionDenied {
                viewer,
                object,
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Looks up the object's owner, then checks permission as [`Self::check_permission`].
    pub async fn check_object_permission(
        &self,
        owners: &dyn ObjectOwnerLookup,
        viewer: UserId,
        object: ObjectId,
        action: &str,
    ) -> Result<(), AuthzError> {
        let owner = owners.owner_of(object).await?;
        self.check_permission(viewer, owner, object, action).await
    }
}
