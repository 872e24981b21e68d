//! Dataset commit history model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::catalog::CatalogCommit;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DatasetHistory {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub commit_id: String,
    pub commit_message: Option<String>,
    pub committed_at: DateTime<Utc>,
}

impl DatasetHistory {
    /// Mirror one catalog commit; an already-seen (dataset, commit) pair
    /// returns the existing row.
    pub async fn record(
        pool: &PgPool,
        dataset_id: Uuid,
        commit: &CatalogCommit,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DatasetHistory>(
            r#"
            INSERT INTO dataset_history (dataset_id, commit_id, commit_message, committed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (dataset_id, commit_id)
                DO UPDATE SET commit_message = EXCLUDED.commit_message
            RETURNING *
            "#,
        )
        .bind(dataset_id)
        .bind(&commit.id)
        .bind(&commit.title)
        .bind(commit.date)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_dataset(
        pool: &PgPool,
        dataset_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DatasetHistory>(
            r#"
            SELECT * FROM dataset_history
            WHERE dataset_id = $1
            ORDER BY committed_at DESC
            "#,
        )
        .bind(dataset_id)
        .fetch_all(pool)
        .await
    }
}
