//! Impact assessor: strategy dispatch and the embedder singleton.

use parking_lot::Mutex;

use super::cluster::{self, CLUSTER_SEED};
use super::embedding::{OnnxEmbedder, TextEmbedder};
use super::naive;
use super::{ImpactError, ImpactInput, ImpactLevel, ImpactMethod, ImpactOutcome, ImpactResult};

/// Where the ONNX model and tokenizer live on disk.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub model_path: String,
    pub tokenizer_path: String,
}

/// Two-mode impact scorer. The embedding model is loaded on the first
/// advanced assessment and reused for the life of the process; the Mutex
/// serializes first-use so concurrent requests cannot double-load it.
pub struct ImpactAssessor {
    config: EmbedderConfig,
    embedder: Mutex<Option<Box<dyn TextEmbedder>>>,
}

impl ImpactAssessor {
    pub fn new(config: EmbedderConfig) -> Self {
        Self {
            config,
            embedder: Mutex::new(None),
        }
    }

    /// Build an assessor over a preloaded embedder.
    #[cfg(test)]
    pub fn with_embedder(embedder: Box<dyn TextEmbedder>) -> Self {
        Self {
            config: EmbedderConfig {
                model_path: String::new(),
                tokenizer_path: String::new(),
            },
            embedder: Mutex::new(Some(embedder)),
        }
    }

    /// Run the selected strategy over the inputs.
    pub fn assess(
        &self,
        inputs: &[ImpactInput],
        method: ImpactMethod,
    ) -> Result<ImpactResult, ImpactError> {
        match method {
            ImpactMethod::Naive => Ok(naive::assess(inputs)),
            ImpactMethod::Advanced => self.advanced(inputs),
        }
    }

    fn advanced(&self, inputs: &[ImpactInput]) -> Result<ImpactResult, ImpactError> {
        let descriptions: Vec<String> = inputs
            .iter()
            .map(|input| input.description.clone().unwrap_or_default())
            .collect();

        // Without any descriptions there is nothing to embed; score by size
        // instead. Callers see which strategy ran via the result's tag.
        if descriptions.iter().all(|d| d.is_empty()) {
            return Ok(naive::assess(inputs));
        }

        let embeddings = {
            let mut guard = self.embedder.lock();
            if guard.is_none() {
                tracing::info!("Loading embedding model from {}", self.config.model_path);
                let loaded =
                    OnnxEmbedder::load(&self.config.model_path, &self.config.tokenizer_path)
                        .map_err(|e| ImpactError::ModelLoad(e.to_string()))?;
                *guard = Some(Box::new(loaded));
            }

            let embedder = guard
                .as_mut()
                .ok_or_else(|| ImpactError::ModelLoad("embedder unavailable".to_string()))?;
            embedder
                .embed(&descriptions)
                .map_err(|e| ImpactError::Embedding(e.to_string()))?
        };

        let k = inputs.len().min(3);
        let labels = cluster::kmeans(&embeddings, k, CLUSTER_SEED);
        let cluster_count = cluster::populated_clusters(&labels);

        let (level, explanation) = match cluster_count {
            1 => (
                ImpactLevel::Low,
                "Descriptions are semantically similar (single cluster).",
            ),
            2 => (
                ImpactLevel::Medium,
                "Descriptions form two distinct semantic clusters.",
            ),
            _ => (
                ImpactLevel::High,
                "Descriptions are diverse and form multiple semantic clusters.",
            ),
        };

        Ok(ImpactResult {
            level,
            explanation: explanation.to_string(),
            outcome: ImpactOutcome::Advanced { cluster_count },
        })
    }
}
