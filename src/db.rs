//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Users
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    last_login TIMESTAMPTZ
);

-- Datasets mirrored from the external catalog
CREATE TABLE IF NOT EXISTS datasets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    catalog_id VARCHAR(512) NOT NULL UNIQUE,
    name VARCHAR(512) NOT NULL,
    description TEXT,
    last_modified TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    size_bytes BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Follow edges
CREATE TABLE IF NOT EXISTS dataset_followers (
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    dataset_id UUID REFERENCES datasets(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, dataset_id)
);

-- Commit history mirrored per dataset
CREATE TABLE IF NOT EXISTS dataset_history (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    dataset_id UUID REFERENCES datasets(id) ON DELETE CASCADE,
    commit_id VARCHAR(128) NOT NULL,
    commit_message TEXT,
    committed_at TIMESTAMPTZ NOT NULL,
    UNIQUE (dataset_id, commit_id)
);

-- User-owned dataset groupings
CREATE TABLE IF NOT EXISTS combined_datasets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    created_by UUID REFERENCES users(id) ON DELETE CASCADE,
    impact_level VARCHAR(10),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Grouping membership
CREATE TABLE IF NOT EXISTS combined_dataset_members (
    combined_id UUID REFERENCES combined_datasets(id) ON DELETE CASCADE,
    dataset_id UUID REFERENCES datasets(id) ON DELETE CASCADE,
    PRIMARY KEY (combined_id, dataset_id)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_datasets_catalog ON datasets(catalog_id);
CREATE INDEX IF NOT EXISTS idx_followers_dataset ON dataset_followers(dataset_id);
CREATE INDEX IF NOT EXISTS idx_history_dataset ON dataset_history(dataset_id, committed_at);
CREATE INDEX IF NOT EXISTS idx_combined_owner ON combined_datasets(created_by);
"#;
