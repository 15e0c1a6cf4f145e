//! Privacy-attribute records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::{AttributeValueId, ObjectId, PrivacyAttributeId};

/// A named policy on a protected object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyAttribute {
    /// Unique identifier.
    pub id: PrivacyAttributeId,
    /// The protected object.
    pub object: ObjectId,
    /// The attribute name, usually the action it governs.
    pub name: String,
    /// When the attribute was created.
    pub created_at: DateTime<Utc>,
}

impl PrivacyAttribute {
    /// Creates a new attribute record.
    #[must_use]
    pub fn new(object: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id: PrivacyAttributeId::new(),
            object,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A permitted value (relationship name) of a privacy attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// Unique identifier.
    pub id: AttributeValueId,
    /// The attribute this value belongs to.
    pub attribute: PrivacyAttributeId,
    /// The permitted relationship name.
    pub value: String,
    /// When the value was assigned.
    pub created_at: DateTime<Utc>,
}

impl AttributeValue {
    /// Creates a new value record.
    #[must_use]
    pub fn new(attribute: PrivacyAttributeId, value: impl Into<String>) -> Self {
        Self {
            id: AttributeValueId::new(),
            attribute,
            value: value.into(),
            created_at: Utc::now(),
        }
    }
}
