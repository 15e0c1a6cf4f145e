//! HTTP routes over the registries and the checker.
//!
//! Relationship routes act on the caller's own relationship namespace.
//! Objects are registered through `POST /objects` by their owner. Only the
//! owner may change an object's privacy attributes, and permission checks
//! take the owner from the object directory.

use crate::error::ApiError;
use crate::identity::ActingUser;
use crate::objects::ObjectRecord;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use tether_authz::IdentityResolver;
use tether_core::{ObjectId, UserId};
use tether_privacy::PrivacyAttribute;
use tether_relations::RelationshipType;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/relations", post(create_relation).get(list_relations))
        .route("/relations/{name}", delete(delete_relation))
        .route("/relations/{name}/targets", get(list_targets).post(relate))
        .route("/relations/{name}/targets/{target}", delete(unrelate))
        .route("/users/{user}/relations", get(shared_relations))
        .route("/objects", post(register_object))
        .route("/objects/{object}", get(get_object))
        .route(
            "/objects/{object}/attributes",
            post(create_attribute).get(list_attributes),
        )
        .route("/objects/{object}/attributes/{name}", delete(delete_attribute))
        .route(
            "/objects/{object}/attributes/{name}/values",
            get(list_values).post(assign_value),
        )
        .route(
            "/objects/{object}/attributes/{name}/satisfies",
            get(value_satisfies),
        )
        .route("/objects/{object}/check", post(check_permission))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TargetBody {
    target: String,
}

#[derive(Debug, Deserialize)]
struct ValueBody {
    value: String,
}

#[derive(Debug, Deserialize)]
struct CheckBody {
    action: String,
}

#[derive(Debug, Serialize)]
struct Removed {
    removed: u64,
}

async fn create_relation(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<RelationshipType>), ApiError> {
    let relation = state.relations.create_type(owner, &body.name).await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

async fn list_relations(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
) -> Result<Json<Vec<RelationshipType>>, ApiError> {
    Ok(Json(state.relations.types_of(owner).await?))
}

async fn delete_relation(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Path(name): Path<String>,
) -> Result<Json<Removed>, ApiError> {
    let removed = state.relations.delete_type(owner, &name).await?;
    Ok(Json(Removed { removed }))
}

async fn list_targets(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Path(name): Path<String>,
) -> Result<Json<Vec<UserId>>, ApiError> {
    Ok(Json(state.relations.targets_of_type(owner, &name).await?))
}

async fn relate(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Path(name): Path<String>,
    Json(body): Json<TargetBody>,
) -> Result<StatusCode, ApiError> {
    let target = state.identities.resolve(&body.target).await?;
    state.relations.relate(owner, target, &name).await?;
    Ok(StatusCode::CREATED)
}

async fn unrelate(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Path((name, target)): Path<(String, String)>,
) -> Result<Json<Removed>, ApiError> {
    let target = state.identities.resolve(&target).await?;
    let removed = state.relations.unrelate(owner, target, &name).await?;
    Ok(Json(Removed { removed }))
}

async fn shared_relations(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
    Path(user): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let viewer = state.identities.resolve(&user).await?;
    Ok(Json(state.relations.shared_relation_names(owner, viewer).await?))
}

async fn register_object(
    State(state): State<AppState>,
    ActingUser(owner): ActingUser,
) -> Result<(StatusCode, Json<ObjectRecord>), ApiError> {
    let record = state.objects.register(owner).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_object(
    State(state): State<AppState>,
    ActingUser(_): ActingUser,
    Path(object): Path<String>,
) -> Result<Json<ObjectRecord>, ApiError> {
    let object = ObjectId::from_str(&object)?;
    Ok(Json(state.objects.get(object).await?))
}

async fn create_attribute(
    State(state): State<AppState>,
    ActingUser(acting): ActingUser,
    Path(object): Path<String>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<PrivacyAttribute>), ApiError> {
    let object = ObjectId::from_str(&object)?;
    state
        .objects
        .require_owner(acting, object, "create privacy attribute")
        .await?;
    let attribute = state.privacy.create_attribute(object, &body.name).await?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

async fn list_attributes(
    State(state): State<AppState>,
    ActingUser(_): ActingUser,
    Path(object): Path<String>,
) -> Result<Json<Vec<PrivacyAttribute>>, ApiError> {
    let object = ObjectId::from_str(&object)?;
    Ok(Json(state.privacy.attributes_of(object).await?))
}

async fn delete_attribute(
    State(state): State<AppState>,
    ActingUser(acting): ActingUser,
    Path((object, name)): Path<(String, String)>,
) -> Result<Json<Removed>, ApiError> {
    let object = ObjectId::from_str(&object)?;
    state
        .objects
        .require_owner(acting, object, "delete privacy attribute")
        .await?;
    let removed = state.privacy.delete_attribute(object, &name).await?;
    Ok(Json(Removed { removed }))
}

async fn list_values(
    State(state): State<AppState>,
    ActingUser(_): ActingUser,
    Path((object, name)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let object = ObjectId::from_str(&object)?;
    Ok(Json(state.privacy.values_of(object, &name).await?))
}

async fn assign_value(
    State(state): State<AppState>,
    ActingUser(acting): ActingUser,
    Path((object, name)): Path<(String, String)>,
    Json(body): Json<ValueBody>,
) -> Result<StatusCode, ApiError> {
    let object = ObjectId::from_str(&object)?;
    state
        .objects
        .require_owner(acting, object, "assign privacy value")
        .await?;
    state.privacy.assign_value(object, &name, &body.value).await?;
    Ok(StatusCode::CREATED)
}

async fn value_satisfies(
    State(state): State<AppState>,
    ActingUser(_): ActingUser,
    Path((object, name)): Path<(String, String)>,
    Query(query): Query<ValueBody>,
) -> Result<Json<Value>, ApiError> {
    let object = ObjectId::from_str(&object)?;
    let satisfies = state
        .privacy
        .value_satisfies(object, &name, &query.value)
        .await?;
    Ok(Json(json!({ "satisfies": satisfies })))
}

async fn check_permission(
    State(state): State<AppState>,
    ActingUser(viewer): ActingUser,
    Path(object): Path<String>,
    Json(body): Json<CheckBody>,
) -> Result<StatusCode, ApiError> {
    let object = ObjectId::from_str(&object)?;
    state
        .checker
        .check_object_permission(&state.objects, viewer, object, &body.action)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
