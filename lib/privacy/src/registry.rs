//! The privacy-attribute registry.

use crate::error::PrivacyError;
use crate::store::PrivacyStore;
use crate::types::{AttributeValue, PrivacyAttribute};
use std::sync::Arc;
use tether_core::{ObjectId, Result};
use tracing::{debug, instrument};

/// Registry of privacy attributes and their permitted values.
///
/// Like the relationship registry, every mutation of an existing attribute is
/// a lookup followed by a separate write, without a transaction.
#[derive(Clone)]
pub struct PrivacyRegistry {
    store: Arc<dyn PrivacyStore>,
    unique_names: bool,
}

impl PrivacyRegistry {
    /// Creates a registry that tolerates duplicate attribute names.
    pub fn new(store: Arc<dyn PrivacyStore>) -> Self {
        Self {
            store,
            unique_names: false,
        }
    }

    /// Enables or disables rejecting a second attribute with the same (object, name).
    #[must_use]
    pub fn with_unique_names(mut self, unique_names: bool) -> Self {
        self.unique_names = unique_names;
        self
    }

    /// Creates a privacy attribute on `object`.
    #[instrument(skip(self, name), fields(object = %object, attribute = name))]
    pub async fn create_attribute(
        &self,
        object: ObjectId,
        name: &str,
    ) -> Result<PrivacyAttribute, PrivacyError> {
        if self.unique_names && self.store.find_attribute(object, name).await?.is_some() {
            return Err(PrivacyError::DuplicateAttribute {
                object,
                name: name.to_string(),
            }
            .into());
        }

        let record = PrivacyAttribute::new(object, name);
        self.store.insert_attribute(&record).await?;

        debug!(id = %record.id, "privacy attribute created");
        Ok(record)
    }

    /// Appends `value` to the permitted values of the attribute.
    #[instrument(skip(self, name, value), fields(object = %object, attribute = name, value = value))]
    pub async fn assign_value(
        &self,
        object: ObjectId,
        name: &str,
        value: &str,
    ) -> Result<(), PrivacyError> {
        let attribute = self.resolve(object, name).await?;
        let record = AttributeValue::new(attribute.id, value);
        self.store.insert_value(&record).await?;

        debug!(id = %record.id, "attribute value assigned");
        Ok(())
    }

    /// Returns true if `value` is one of the attribute's permitted values.
    pub async fn value_satisfies(
        &self,
        object: ObjectId,
        name: &str,
        value: &str,
    ) -> Result<bool, PrivacyError> {
        self.any_value_satisfies(object, name, &[value]).await
    }

    /// Returns true if at least one candidate is a permitted value.
    ///
    /// Fails with [`PrivacyError::AttributeNotFound`] when the object has no
    /// such attribute; an empty candidate list is simply unsatisfied.
    #[instrument(skip(self, name, candidates), fields(object = %object, attribute = name, candidates = candidates.len()))]
    pub async fn any_value_satisfies<S: AsRef<str>>(
        &self,
        object: ObjectId,
        name: &str,
        candidates: &[S],
    ) -> Result<bool, PrivacyError> {
        let values = self.values_of(object, name).await?;
        let satisfied = candidates
            .iter()
            .any(|candidate| values.iter().any(|v| v == candidate.as_ref()));

        debug!(satisfied, "attribute values checked");
        Ok(satisfied)
    }

    /// Deletes every attribute named `name` on `object`.
    ///
    /// Values of the deleted attributes stay in the store but are unreachable.
    #[instrument(skip(self, name), fields(object = %object, attribute = name))]
    pub async fn delete_attribute(&self, object: ObjectId, name: &str) -> Result<u64, PrivacyError> {
        let removed = self.store.delete_attributes(object, name).await?;

        debug!(removed, "privacy attributes deleted");
        Ok(removed)
    }

    /// Lists the attributes of `object`.
    pub async fn attributes_of(&self, object: ObjectId) -> Result<Vec<PrivacyAttribute>, PrivacyError> {
        self.store.list_attributes(object).await
    }

    /// Lists the permitted values of the attribute, duplicates included.
    pub async fn values_of(&self, object: ObjectId, name: &str) -> Result<Vec<String>, PrivacyError> {
        let attribute = self.resolve(object, name).await?;
        let values = self.store.list_values(attribute.id).await?;
        Ok(values.into_iter().map(|v| v.value).collect())
    }

    async fn resolve(&self, object: ObjectId, name: &str) -> Result<PrivacyAttribute, PrivacyError> {
        self.store
            .find_attribute(object, name)
            .await?
            .ok_or_else(|| {
                PrivacyError::AttributeNotFound {
                    object,
                    name: name.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryPrivacyStore;

    fn registry() -> (PrivacyRegistry, Arc<InMemoryPrivacyStore>) {
        let store = InMemoryPrivacyStore::shared();
        (PrivacyRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn assigned_value_satisfies() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();

        registry.assign_value(post, "reply", "friend").await.unwrap();

        assert!(registry.value_satisfies(post, "reply", "friend").await.unwrap());
        assert!(!registry.value_satisfies(post, "reply", "stranger").await.unwrap());
    }

    #[tokio::test]
    async fn comparison_is_exact() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();
        registry.assign_value(post, "reply", "friend").await.unwrap();

        assert!(!registry.value_satisfies(post, "reply", "Friend").await.unwrap());
        assert!(!registry.value_satisfies(post, "reply", "friend ").await.unwrap());
    }

    #[tokio::test]
    async fn assign_to_missing_attribute_is_not_found() {
        let (registry, _) = registry();
        let err = registry
            .assign_value(ObjectId::new(), "reply", "friend")
            .await
            .unwrap_err();

        assert!(err.current_context().is_not_found());
    }

    #[tokio::test]
    async fn value_satisfies_missing_attribute_is_not_found() {
        let (registry, _) = registry();
        let err = registry
            .value_satisfies(ObjectId::new(), "reply", "friend")
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            PrivacyError::AttributeNotFound { name, .. } if name == "reply"
        ));
    }

    #[tokio::test]
    async fn any_value_satisfies_needs_one_match() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "view").await.unwrap();
        registry.assign_value(post, "view", "family").await.unwrap();

        let hit = ["coworker".to_string(), "family".to_string()];
        let miss = ["coworker".to_string()];
        let none: [String; 0] = [];

        assert!(registry.any_value_satisfies(post, "view", &hit).await.unwrap());
        assert!(!registry.any_value_satisfies(post, "view", &miss).await.unwrap());
        assert!(!registry.any_value_satisfies(post, "view", &none).await.unwrap());
    }

    #[tokio::test]
    async fn attribute_without_values_is_never_satisfied() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();

        assert!(!registry.value_satisfies(post, "reply", "").await.unwrap());
        assert!(registry.values_of(post, "reply").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_values_are_kept() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();
        registry.assign_value(post, "reply", "friend").await.unwrap();
        registry.assign_value(post, "reply", "friend").await.unwrap();

        assert_eq!(
            registry.values_of(post, "reply").await.unwrap(),
            vec!["friend".to_string(), "friend".to_string()]
        );
    }

    #[tokio::test]
    async fn attributes_are_scoped_to_their_object() {
        let (registry, _) = registry();
        let (post, other) = (ObjectId::new(), ObjectId::new());
        registry.create_attribute(post, "reply").await.unwrap();
        registry.create_attribute(post, "view").await.unwrap();

        let names: Vec<_> = registry
            .attributes_of(post)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["reply".to_string(), "view".to_string()]);
        assert!(registry.attributes_of(other).await.unwrap().is_empty());
        assert!(registry.value_satisfies(other, "reply", "friend").await.is_err());
    }

    #[tokio::test]
    async fn unique_names_reject_second_attribute() {
        let (registry, _) = registry();
        let registry = registry.with_unique_names(true);
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();

        let err = registry.create_attribute(post, "reply").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            PrivacyError::DuplicateAttribute { .. }
        ));
    }

    #[tokio::test]
    async fn duplicate_attributes_resolve_to_the_first() {
        let (registry, _) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();
        registry.create_attribute(post, "reply").await.unwrap();
        registry.assign_value(post, "reply", "friend").await.unwrap();

        assert_eq!(registry.attributes_of(post).await.unwrap().len(), 2);
        assert!(registry.value_satisfies(post, "reply", "friend").await.unwrap());
    }

    #[tokio::test]
    async fn delete_attribute_orphans_values() {
        let (registry, store) = registry();
        let post = ObjectId::new();
        registry.create_attribute(post, "reply").await.unwrap();
        registry.assign_value(post, "reply", "friend").await.unwrap();

        assert_eq!(registry.delete_attribute(post, "reply").await.unwrap(), 1);
        assert_eq!(store.value_count().await, 1);

        registry.create_attribute(post, "reply").await.unwrap();
        assert!(!registry.value_satisfies(post, "reply", "friend").await.unwrap());
    }
}
