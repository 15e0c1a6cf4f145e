//! Privacy attributes and their values in PostgreSQL.

use super::decode_id;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tether_core::{ObjectId, PrivacyAttributeId, Result};
use tether_privacy::{AttributeValue, PrivacyAttribute, PrivacyError, PrivacyStore};

#[derive(FromRow)]
struct PrivacyAttributeRow {
    id: String,
    object_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl PrivacyAttributeRow {
    fn try_into_attribute(self) -> Result<PrivacyAttribute, PrivacyError> {
        Ok(PrivacyAttribute {
            id: decode_id(&self.id).map_err(PrivacyError::storage)?,
            object: decode_id(&self.object_id).map_err(PrivacyError::storage)?,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct AttributeValueRow {
    id: String,
    attribute_id: String,
    value: String,
    created_at: DateTime<Utc>,
}

impl AttributeValueRow {
    fn try_into_value(self) -> Result<AttributeValue, PrivacyError> {
        Ok(AttributeValue {
            id: decode_id(&self.id).map_err(PrivacyError::storage)?,
            attribute: decode_id(&self.attribute_id).map_err(PrivacyError::storage)?,
            value: self.value,
            created_at: self.created_at,
        })
    }
}

/// Privacy store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgPrivacyStore {
    pool: PgPool,
}

impl PgPrivacyStore {
    /// Creates a new store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrivacyStore for PgPrivacyStore {
    async fn insert_attribute(&self, record: &PrivacyAttribute) -> Result<(), PrivacyError> {
        sqlx::query(
            r#"
            INSERT INTO privacy_attributes (id, object_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.object.to_string())
        .bind(&record.name)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        Ok(())
    }

    async fn find_attribute(
        &self,
        object: ObjectId,
        name: &str,
    ) -> Result<Option<PrivacyAttribute>, PrivacyError> {
        let row: Option<PrivacyAttributeRow> = sqlx::query_as(
            r#"
            SELECT id, object_id, name, created_at
            FROM privacy_attributes
            WHERE object_id = $1 AND name = $2
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(object.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        row.map(PrivacyAttributeRow::try_into_attribute).transpose()
    }

    async fn list_attributes(&self, object: ObjectId) -> Result<Vec<PrivacyAttribute>, PrivacyError> {
        let rows: Vec<PrivacyAttributeRow> = sqlx::query_as(
            r#"
            SELECT id, object_id, name, created_at
            FROM privacy_attributes
            WHERE object_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(object.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        rows.into_iter().map(|r| r.try_into_attribute()).collect()
    }

    async fn delete_attributes(&self, object: ObjectId, name: &str) -> Result<u64, PrivacyError> {
        let result = sqlx::query(
            r#"
            DELETE FROM privacy_attributes
            WHERE object_id = $1 AND name = $2
            "#,
        )
        .bind(object.to_string())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        Ok(result.rows_affected())
    }

    async fn insert_value(&self, value: &AttributeValue) -> Result<(), PrivacyError> {
        sqlx::query(
            r#"
            INSERT INTO attribute_values (id, attribute_id, value, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(value.id.to_string())
        .bind(value.attribute.to_string())
        .bind(&value.value)
        .bind(value.created_at)
        .execute(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        Ok(())
    }

    async fn list_values(
        &self,
        attribute: PrivacyAttributeId,
    ) -> Result<Vec<AttributeValue>, PrivacyError> {
        let rows: Vec<AttributeValueRow> = sqlx::query_as(
            r#"
            SELECT id, attribute_id, value, created_at
            FROM attribute_values
            WHERE attribute_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(attribute.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(PrivacyError::storage)?;

        rows.into_iter().map(|r| r.try_into_value()).collect()
    }
}
