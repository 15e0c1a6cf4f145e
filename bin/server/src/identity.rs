//! Acting-user extraction and handle resolution.
//!
//! Sessions are owned by the upstream gateway, which authenticates the caller
//! and forwards their user id in the `x-user-id` header.

use crate::error::ApiError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;
use tether_authz::{AuthzError, IdentityResolver};
use tether_core::UserId;

/// Header carrying the authenticated user's id.
pub const ACTING_USER_HEADER: &str = "x-user-id";

/// Extractor for the user on whose behalf the request runs.
pub struct ActingUser(pub UserId);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let user = UserId::from_str(raw).map_err(|_| ApiError::Unauthenticated)?;
        Ok(ActingUser(user))
    }
}

/// Resolves handles that are user ids in display (`usr_...`) or bare ULID form.
///
/// Users are owned by the upstream session layer, so this resolver does not
/// check that the id belongs to an existing account: any well-formed id
/// resolves, and only malformed handles fail with
/// [`AuthzError::UserNotFound`]. Deployments with a user directory or
/// username handles plug in their own [`IdentityResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserIdResolver;

#[async_trait]
impl IdentityResolver for UserIdResolver {
    async fn resolve(&self, handle: &str) -> tether_core::Result<UserId, AuthzError> {
        UserId::from_str(handle).map_err(|_| {
            AuthzError::UserNotFound {
                handle: handle.to_string(),
            }
            .into()
        })
    }
}
