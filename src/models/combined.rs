//! Combined dataset model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::Dataset;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CombinedDataset {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub impact_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Grouping plus its member datasets, the shape handlers return.
#[derive(Debug, Serialize)]
pub struct CombinedDatasetDetail {
    #[serde(flatten)]
    pub combined: CombinedDataset,
    pub datasets: Vec<Dataset>,
}

impl CombinedDataset {
    /// Create a grouping and its membership rows in one transaction.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
        dataset_ids: &[Uuid],
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let combined = sqlx::query_as::<_, CombinedDataset>(
            r#"
            INSERT INTO combined_datasets (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for dataset_id in dataset_ids {
            sqlx::query(
                r#"
                INSERT INTO combined_dataset_members (combined_id, dataset_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(combined.id)
            .bind(dataset_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(combined)
    }

    pub async fn set_impact_level(
        pool: &PgPool,
        id: Uuid,
        level: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE combined_datasets SET impact_level = $1 WHERE id = $2")
            .bind(level)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CombinedDataset>("SELECT * FROM combined_datasets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CombinedDataset>(
            r#"
            SELECT * FROM combined_datasets
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM combined_datasets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Member datasets of one grouping.
    pub async fn members(pool: &PgPool, combined_id: Uuid) -> Result<Vec<Dataset>, sqlx::Error> {
        sqlx::query_as::<_, Dataset>(
            r#"
            SELECT d.* FROM datasets d
            JOIN combined_dataset_members m ON m.dataset_id = d.id
            WHERE m.combined_id = $1
            ORDER BY d.name
            "#,
        )
        .bind(combined_id)
        .fetch_all(pool)
        .await
    }
}
