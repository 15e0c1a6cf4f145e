//! Relationship types and edges in PostgreSQL.

use super::decode_id;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tether_core::{RelationshipTypeId, Result, UserId};
use tether_relations::{RelationEdge, RelationshipError, RelationshipStore, RelationshipType};

/// Row type for relationship type queries.
#[derive(FromRow)]
struct RelationshipTypeRow {
    id: String,
    owner_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl RelationshipTypeRow {
    fn try_into_type(self) -> Result<RelationshipType, RelationshipError> {
        Ok(RelationshipType {
            id: decode_id(&self.id).map_err(RelationshipError::storage)?,
            owner: decode_id(&self.owner_id).map_err(RelationshipError::storage)?,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Row type for edge queries.
#[derive(FromRow)]
struct RelationEdgeRow {
    id: String,
    relationship_type_id: String,
    target_id: String,
    created_at: DateTime<Utc>,
}

impl RelationEdgeRow {
    fn try_into_edge(self) -> Result<RelationEdge, RelationshipError> {
        Ok(RelationEdge {
            id: decode_id(&self.id).map_err(RelationshipError::storage)?,
            relationship_type: decode_id(&self.relationship_type_id)
                .map_err(RelationshipError::storage)?,
            target: decode_id(&self.target_id).map_err(RelationshipError::storage)?,
            created_at: self.created_at,
        })
    }
}

/// Relationship store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgRelationshipStore {
    pool: PgPool,
}

impl PgRelationshipStore {
    /// Creates a new store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipStore for PgRelationshipStore {
    async fn insert_type(&self, record: &RelationshipType) -> Result<(), RelationshipError> {
        sqlx::query(
            r#"
            INSERT INTO relationship_types (id, owner_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.owner.to_string())
        .bind(&record.name)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        Ok(())
    }

    async fn find_type(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<RelationshipType>, RelationshipError> {
        let row: Option<RelationshipTypeRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, name, created_at
            FROM relationship_types
            WHERE owner_id = $1 AND name = $2
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(owner.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        row.map(RelationshipTypeRow::try_into_type).transpose()
    }

    async fn list_types(&self, owner: UserId) -> Result<Vec<RelationshipType>, RelationshipError> {
        let rows: Vec<RelationshipTypeRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, name, created_at
            FROM relationship_types
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        rows.into_iter().map(|r| r.try_into_type()).collect()
    }

    async fn delete_types(&self, owner: UserId, name: &str) -> Result<u64, RelationshipError> {
        let result = sqlx::query(
            r#"
            DELETE FROM relationship_types
            WHERE owner_id = $1 AND name = $2
            "#,
        )
        .bind(owner.to_string())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        Ok(result.rows_affected())
    }

    async fn insert_edge(&self, edge: &RelationEdge) -> Result<(), RelationshipError> {
        sqlx::query(
            r#"
            INSERT INTO relation_edges (id, relationship_type_id, target_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(edge.id.to_string())
        .bind(edge.relationship_type.to_string())
        .bind(edge.target.to_string())
        .bind(edge.created_at)
        .execute(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        Ok(())
    }

    async fn edge_exists(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<bool, RelationshipError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM relation_edges
                WHERE relationship_type_id = $1 AND target_id = $2
            )
            "#,
        )
        .bind(relationship_type.to_string())
        .bind(target.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        Ok(exists)
    }

    async fn delete_edges(
        &self,
        relationship_type: RelationshipTypeId,
        target: UserId,
    ) -> Result<u64, RelationshipError> {
        let result = sqlx::query(
            r#"
            DELETE FROM relation_edges
            WHERE relationship_type_id = $1 AND target_id = $2
            "#,
        )
        .bind(relationship_type.to_string())
        .bind(target.to_string())
        .execute(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        Ok(result.rows_affected())
    }

    async fn list_edges(
        &self,
        relationship_type: RelationshipTypeId,
    ) -> Result<Vec<RelationEdge>, RelationshipError> {
        let rows: Vec<RelationEdgeRow> = sqlx::query_as(
            r#"
            SELECT id, relationship_type_id, target_id, created_at
            FROM relation_edges
            WHERE relationship_type_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(relationship_type.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(RelationshipError::storage)?;

        rows.into_iter().map(|r| r.try_into_edge()).collect()
    }
}
