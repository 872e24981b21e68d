//! Impact assessment
//!
//! Scores how significant a combination of datasets is. Two strategies:
//! `naive` sums byte sizes against fixed thresholds; `advanced` embeds the
//! dataset descriptions and clusters them to estimate semantic diversity.
//! The result is tagged with the strategy that actually ran, since the
//! advanced path falls back to naive when no descriptions are present.

mod assessor;
mod cluster;
mod embedding;
mod naive;

#[cfg(test)]
mod tests;

pub use assessor::{EmbedderConfig, ImpactAssessor};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reduced view of one dataset, assembled by the caller. The assessor never
/// fetches data itself.
#[derive(Debug, Clone, Default)]
pub struct ImpactInput {
    pub size_bytes: Option<i64>,
    pub description: Option<String>,
}

/// Qualitative impact bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Which strategy actually ran, with its diagnostic payload. Serialized
/// flat into the result under a `method` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ImpactOutcome {
    Naive { total_size_bytes: i64 },
    Advanced { cluster_count: usize },
}

/// Result of one assessment.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactResult {
    pub level: ImpactLevel,
    pub explanation: String,
    #[serde(flatten)]
    pub outcome: ImpactOutcome,
}

/// Strategy selector, parsed from the request before any assessment work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactMethod {
    Naive,
    Advanced,
}

impl std::str::FromStr for ImpactMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Self::Naive),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("Invalid assessment method: {}", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImpactError {
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),

    #[error("failed to embed descriptions: {0}")]
    Embedding(String),
}
