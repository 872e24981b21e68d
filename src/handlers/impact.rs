//! Impact assessment handler

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::impact::{ImpactInput, ImpactMethod, ImpactResult};
use crate::middleware::auth::UserContext;
use crate::models::Dataset;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ImpactRequest {
    pub dataset_ids: Vec<Uuid>,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "naive".to_string()
}

/// Assess the impact of combining datasets
pub async fn assess(
    State(state): State<AppState>,
    _ctx: UserContext,
    Json(req): Json<ImpactRequest>,
) -> AppResult<Json<ImpactResult>> {
    // Unknown method is the caller's mistake, caught before any lookups
    let method: ImpactMethod = req.method.parse().map_err(AppError::ValidationError)?;

    let mut inputs = Vec::with_capacity(req.dataset_ids.len());
    for dataset_id in &req.dataset_ids {
        let dataset = Dataset::find_by_id(&state.pool, *dataset_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Dataset with ID {} not found", dataset_id))
            })?;
        inputs.push(ImpactInput {
            size_bytes: dataset.size_bytes,
            description: dataset.description,
        });
    }

    let result = state
        .assessor
        .assess(&inputs, method)
        .map_err(|e| AppError::AssessmentFailure(e.to_string()))?;

    Ok(Json(result))
}
