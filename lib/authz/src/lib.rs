//! Relation-based authorization for tether.
//!
//! An object owner decides who may act on an object by assigning relationship
//! names as permitted values of the privacy attribute named after the action.
//! The checker joins the owner's relationships to the viewer with those values;
//! neither registry knows about the other.

mod checker;
mod collaborator;
mod error;

pub use checker::AuthzChecker;
pub use collaborator::{IdentityResolver, ObjectOwnerLookup};
pub use error::AuthzError;
