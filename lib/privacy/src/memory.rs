//! In-memory privacy store.

use crate::error::PrivacyError;
use crate::store::PrivacyStore;
use crate::types::{AttributeValue, PrivacyAttribute};
use async_trait::async_trait;
use std::sync::Arc;
use tether_core::{ObjectId, PrivacyAttributeId, Result};
use tokio::sync::RwLock;

/// A privacy store backed by in-process vectors, in creation order.
#[derive(Debug, Default)]
pub struct InMemoryPrivacyStore {
    attributes: RwLock<Vec<PrivacyAttribute>>,
    values: RwLock<Vec<AttributeValue>>,
}

impl InMemoryPrivacyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the total number of values, including orphaned ones.
    pub async fn value_count(&self) -> usize {
        self.values.read().await.len()
    }
}

#[async_trait]
impl PrivacyStore for InMemoryPrivacyStore {
    async fn insert_attribute(&self, record: &PrivacyAttribute) -> Result<(), PrivacyError> {
        self.attributes.write().await.push(record.clone());
        Ok(())
    }

    async fn find_attribute(
        &self,
        object: ObjectId,
        name: &str,
    ) -> Result<Option<PrivacyAttribute>, PrivacyError> {
        let attributes = self.attributes.read().await;
        Ok(attributes
            .iter()
            .find(|a| a.object == object && a.name == name)
            .cloned())
    }

    async fn list_attributes(&self, object: ObjectId) -> Result<Vec<PrivacyAttribute>, PrivacyError> {
        let attributes = self.attributes.read().await;
        Ok(attributes
            .iter()
            .filter(|a| a.object == object)
            .cloned()
            .collect())
    }

    async fn delete_attributes(&self, object: ObjectId, name: &str) -> Result<u64, PrivacyError> {
        let mut attributes = self.attributes.write().await;
        let before = attributes.len();
        attributes.retain(|a| !(a.object == object && a.name == name));
        Ok((before - attributes.len()) as u64)
    }

    async fn insert_value(&self, value: &AttributeValue) -> Result<(), PrivacyError> {
        self.values.write().await.push(value.clone());
        Ok(())
    }

    async fn list_values(
        &self,
        attribute: PrivacyAttributeId,
    ) -> Result<Vec<AttributeValue>, PrivacyError> {
        let values = self.values.read().await;
        Ok(values
            .iter()
            .filter(|v| v.attribute == attribute)
            .cloned()
            .collect())
    }
}
