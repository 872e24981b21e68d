//! Dataset handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::auth::UserContext;
use crate::models::{Dataset, DatasetHistory, DatasetWithFollowers};
use crate::{AppError, AppResult, AppState};

/// Page of the catalog synced on every listing call.
const CATALOG_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// List public datasets, mirroring the first catalog page into the store
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DatasetWithFollowers>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0);

    let records = state
        .catalog
        .list_datasets(CATALOG_PAGE_SIZE, 0)
        .await
        .map_err(|e| AppError::CatalogFailure(e.to_string()))?;

    let mut result = Vec::with_capacity(records.len());
    for record in &records {
        let dataset = Dataset::find_or_create(&state.pool, record).await?;
        let follower_count = Dataset::follower_count(&state.pool, dataset.id).await?;
        result.push(DatasetWithFollowers {
            dataset,
            follower_count,
        });
    }

    Ok(Json(result.into_iter().skip(offset).take(limit).collect()))
}

/// Get detailed information about one dataset by its catalog id
pub async fn get(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
) -> AppResult<Json<DatasetWithFollowers>> {
    let record = state
        .catalog
        .get_dataset(&catalog_id)
        .await
        .map_err(|e| AppError::NotFound(format!("Dataset not found: {}", e)))?;

    let dataset = Dataset::find_or_create(&state.pool, &record).await?;
    let follower_count = Dataset::follower_count(&state.pool, dataset.id).await?;

    Ok(Json(DatasetWithFollowers {
        dataset,
        follower_count,
    }))
}

/// Get commit history for a dataset, mirroring unseen commits
pub async fn history(
    State(state): State<AppState>,
    _ctx: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<DatasetHistory>>> {
    let dataset = Dataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dataset not found".to_string()))?;

    let commits = state
        .catalog
        .get_history(&dataset.catalog_id)
        .await
        .map_err(|e| AppError::ValidationError(format!("Failed to fetch history: {}", e)))?;

    for commit in &commits {
        DatasetHistory::record(&state.pool, dataset.id, commit).await?;
    }

    let history = DatasetHistory::list_for_dataset(&state.pool, dataset.id).await?;
    Ok(Json(history))
}

/// Follow a dataset
pub async fn follow(
    State(state): State<AppState>,
    ctx: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DatasetWithFollowers>> {
    let dataset = Dataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dataset not found".to_string()))?;

    Dataset::follow(&state.pool, ctx.user_id, dataset.id).await?;

    let follower_count = Dataset::follower_count(&state.pool, dataset.id).await?;
    Ok(Json(DatasetWithFollowers {
        dataset,
        follower_count,
    }))
}

/// Unfollow a dataset
pub async fn unfollow(
    State(state): State<AppState>,
    ctx: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DatasetWithFollowers>> {
    let dataset = Dataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dataset not found".to_string()))?;

    Dataset::unfollow(&state.pool, ctx.user_id, dataset.id).await?;

    let follower_count = Dataset::follower_count(&state.pool, dataset.id).await?;
    Ok(Json(DatasetWithFollowers {
        dataset,
        follower_count,
    }))
}

/// Datasets followed by the current user
pub async fn followed(
    State(state): State<AppState>,
    ctx: UserContext,
) -> AppResult<Json<Vec<DatasetWithFollowers>>> {
    let datasets = Dataset::followed_by(&state.pool, ctx.user_id).await?;

    let mut result = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let follower_count = Dataset::follower_count(&state.pool, dataset.id).await?;
        result.push(DatasetWithFollowers {
            dataset,
            follower_count,
        });
    }

    Ok(Json(result))
}
