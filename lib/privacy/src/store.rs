//! Storage seam for the privacy-attribute registry.

use crate::error::PrivacyError;
use crate::types::{AttributeValue, PrivacyAttribute};
use async_trait::async_trait;
use tether_core::{ObjectId, PrivacyAttributeId, Result};

/// Persistent storage for privacy attributes and their values.
#[async_trait]
pub trait PrivacyStore: Send + Sync {
    /// Inserts an attribute.
    async fn insert_attribute(&self, record: &PrivacyAttribute) -> Result<(), PrivacyError>;

    /// Returns the earliest-created attribute matching (object, name).
    async fn find_attribute(
        &self,
        object: ObjectId,
        name: &str,
    ) -> Result<Option<PrivacyAttribute>, PrivacyError>;

    /// Lists the attributes of an object in creation order.
    async fn list_attributes(&self, object: ObjectId) -> Result<Vec<PrivacyAttribute>, PrivacyError>;

    /// Deletes every attribute matching (object, name). Values are left in place.
    async fn delete_attributes(&self, object: ObjectId, name: &str) -> Result<u64, PrivacyError>;

    /// Appends a value.
    async fn insert_value(&self, value: &AttributeValue) -> Result<(), PrivacyError>;

    /// Lists the values of an attribute in creation order.
    async fn list_values(
        &self,
        attribute: PrivacyAttributeId,
    ) -> Result<Vec<AttributeValue>, PrivacyError>;
}
