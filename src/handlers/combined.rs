//! Combined dataset handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::impact::{ImpactInput, ImpactMethod};
use crate::middleware::auth::UserContext;
use crate::models::{CombinedDataset, CombinedDatasetDetail, Dataset};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCombinedRequest {
    pub name: String,
    pub description: Option<String>,
    pub dataset_ids: Vec<Uuid>,
}

/// Create a combined dataset and score it with the naive method
pub async fn create(
    State(state): State<AppState>,
    ctx: UserContext,
    Json(req): Json<CreateCombinedRequest>,
) -> AppResult<Json<CombinedDatasetDetail>> {
    // Verify all member datasets exist
    let mut datasets = Vec::with_capacity(req.dataset_ids.len());
    for dataset_id in &req.dataset_ids {
        let dataset = Dataset::find_by_id(&state.pool, *dataset_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Dataset with ID {} not found", dataset_id))
            })?;
        datasets.push(dataset);
    }

    let combined = CombinedDataset::create(
        &state.pool,
        &req.name,
        req.description.as_deref(),
        ctx.user_id,
        &req.dataset_ids,
    )
    .await?;

    // Score the grouping by combined size
    let inputs: Vec<ImpactInput> = datasets
        .iter()
        .map(|dataset| ImpactInput {
            size_bytes: dataset.size_bytes,
            description: dataset.description.clone(),
        })
        .collect();
    let assessment = state
        .assessor
        .assess(&inputs, ImpactMethod::Naive)
        .map_err(|e| AppError::AssessmentFailure(e.to_string()))?;

    CombinedDataset::set_impact_level(&state.pool, combined.id, assessment.level.as_str()).await?;

    tracing::info!(
        "Combined dataset created: {} ({} members, impact {}) by {}",
        combined.name,
        datasets.len(),
        assessment.level.as_str(),
        ctx.email
    );

    let combined = CombinedDataset {
        impact_level: Some(assessment.level.as_str().to_string()),
        ..combined
    };

    Ok(Json(CombinedDatasetDetail { combined, datasets }))
}

/// List combined datasets created by the current user
pub async fn list(
    State(state): State<AppState>,
    ctx: UserContext,
) -> AppResult<Json<Vec<CombinedDatasetDetail>>> {
    let groupings = CombinedDataset::list_by_owner(&state.pool, ctx.user_id).await?;

    let mut result = Vec::with_capacity(groupings.len());
    for combined in groupings {
        let datasets = CombinedDataset::members(&state.pool, combined.id).await?;
        result.push(CombinedDatasetDetail { combined, datasets });
    }

    Ok(Json(result))
}

/// Get one combined dataset
pub async fn get(
    State(state): State<AppState>,
    ctx: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CombinedDatasetDetail>> {
    let combined = CombinedDataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Combined dataset not found".to_string()))?;

    // Check ownership
    if combined.created_by != ctx.user_id {
        return Err(AppError::Forbidden);
    }

    let datasets = CombinedDataset::members(&state.pool, combined.id).await?;
    Ok(Json(CombinedDatasetDetail { combined, datasets }))
}

/// Delete a combined dataset (only if owned by the caller)
pub async fn remove(
    State(state): State<AppState>,
    ctx: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let combined = CombinedDataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Combined dataset not found".to_string()))?;

    if combined.created_by != ctx.user_id {
        return Err(AppError::Forbidden);
    }

    CombinedDataset::delete(&state.pool, combined.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
