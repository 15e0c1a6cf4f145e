//! Privacy-attribute registry for tether.
//!
//! A protected object carries named privacy attributes, one per action
//! ("reply", "view"). Each attribute accumulates permitted values, which are
//! relationship names. An action is allowed for anyone related to the owner
//! through one of those names.

mod error;
mod memory;
mod registry;
mod store;
mod types;

pub use error::PrivacyError;
pub use memory::InMemoryPrivacyStore;
pub use registry::PrivacyRegistry;
pub use store::PrivacyStore;
pub use types::{AttributeValue, PrivacyAttribute};
