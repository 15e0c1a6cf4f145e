//! Core domain types and utilities for tether.
//!
//! This crate provides the identifiers and error handling shared by the
//! relationship registry, the privacy-attribute registry and the
//! authorization checker.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{
    AttributeValueId, ObjectId, ParseIdError, PrivacyAttributeId, RelationEdgeId,
    RelationshipTypeId, UserId,
};
