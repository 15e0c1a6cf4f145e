//! Relationship registry for tether.
//!
//! A user defines named, directed relationship types ("friend", "coworker")
//! and attaches them to other users as edges. The registry answers which of
//! an owner's relationship names currently point at a given user, which is
//! the first half of every authorization decision.
//!
//! # Example
//!
//! ```
//! use tether_core::UserId;
//! use tether_relations::{InMemoryRelationshipStore, RelationshipRegistry};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = RelationshipRegistry::new(InMemoryRelationshipStore::shared());
//! let (alice, bob) = (UserId::new(), UserId::new());
//!
//! registry.create_type(alice, "friend").await.unwrap();
//! registry.relate(alice, bob, "friend").await.unwrap();
//!
//! let names = registry.shared_relation_names(alice, bob).await.unwrap();
//! assert_eq!(names, vec!["friend".to_string()]);
//! # });
//! ```

mod error;
mod memory;
mod registry;
mod store;
mod types;

pub use error::RelationshipError;
pub use memory::InMemoryRelationshipStore;
pub use registry::RelationshipRegistry;
pub use store::RelationshipStore;
pub use types::{RelationEdge, RelationshipType};
