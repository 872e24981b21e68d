//! Dataset model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::catalog::CatalogDataset;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Dataset {
    pub id: Uuid,
    pub catalog_id: String,
    pub name: String,
    pub description: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Dataset plus its follower count, the shape handlers return.
#[derive(Debug, Serialize)]
pub struct DatasetWithFollowers {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub follower_count: i64,
}

impl Dataset {
    /// Look up a mirrored dataset by its catalog identifier, creating a stub
    /// row from the catalog record on first sight.
    pub async fn find_or_create(
        pool: &PgPool,
        record: &CatalogDataset,
    ) -> Result<Self, sqlx::Error> {
        if let Some(existing) = Self::find_by_catalog_id(pool, &record.id).await? {
            return Ok(existing);
        }

        sqlx::query_as::<_, Dataset>(
            r#"
            INSERT INTO datasets (catalog_id, name, description, last_modified, size_bytes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (catalog_id) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(&record.id)
        .bind(record.display_name())
        .bind(&record.description)
        .bind(record.last_modified.unwrap_or_else(Utc::now))
        .bind(record.size_bytes)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Dataset>("SELECT * FROM datasets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_catalog_id(
        pool: &PgPool,
        catalog_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Dataset>("SELECT * FROM datasets WHERE catalog_id = $1")
            .bind(catalog_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn follower_count(pool: &PgPool, dataset_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM dataset_followers WHERE dataset_id = $1",
        )
        .bind(dataset_id)
        .fetch_one(pool)
        .await
    }

    /// Record a follow edge; already-following is a no-op.
    pub async fn follow(pool: &PgPool, user_id: Uuid, dataset_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO dataset_followers (user_id, dataset_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(dataset_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a follow edge; not-following is a no-op.
    pub async fn unfollow(
        pool: &PgPool,
        user_id: Uuid,
        dataset_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM dataset_followers WHERE user_id = $1 AND dataset_id = $2")
            .bind(user_id)
            .bind(dataset_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn followed_by(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Dataset>(
            r#"
            SELECT d.* FROM datasets d
            JOIN dataset_followers f ON f.dataset_id = d.id
            WHERE f.user_id = $1
            ORDER BY d.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
