//! Object ownership in PostgreSQL.

use super::decode_id;
use crate::objects::{ObjectRecord, ObjectStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tether_authz::AuthzError;
use tether_core::{ObjectId, Result};

fn lookup_failed(err: impl std::fmt::Display) -> AuthzError {
    AuthzError::LookupFailed {
        details: err.to_string(),
    }
}

#[derive(FromRow)]
struct ObjectRow {
    id: String,
    owner_id: String,
    created_at: DateTime<Utc>,
}

impl ObjectRow {
    fn try_into_record(self) -> Result<ObjectRecord, AuthzError> {
        Ok(ObjectRecord {
            id: decode_id(&self.id).map_err(lookup_failed)?,
            owner: decode_id(&self.owner_id).map_err(lookup_failed)?,
            created_at: self.created_at,
        })
    }
}

/// Object store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgObjectStore {
    pool: PgPool,
}

impl PgObjectStore {
    /// Creates a new store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObjectStore for PgObjectStore {
    async fn insert_object(&self, record: &ObjectRecord) -> Result<(), AuthzError> {
        sqlx::query(
            r#"
            INSERT INTO protected_objects (id, owner_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.owner.to_string())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(lookup_failed)?;

        Ok(())
    }

    async fn find_object(&self, object: ObjectId) -> Result<Option<ObjectRecord>, AuthzError> {
        let row: Option<ObjectRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, created_at
            FROM protected_objects
            WHERE id = $1
            "#,
        )
        .bind(object.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(lookup_failed)?;

        row.map(ObjectRow::try_into_record).transpose()
    }
}
