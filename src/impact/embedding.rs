//! Text embedding backends.
//!
//! The production backend runs a MiniLM-class sentence-embedding model
//! through ONNX Runtime. Identical input must always produce identical
//! vectors; the assessor's determinism depends on it.

use std::path::Path;

use anyhow::{anyhow, Result};
use ndarray::ArrayView3;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

const MINILM_MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";

/// Sentence-embedding model.
pub trait TextEmbedder: Send {
    fn embed(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// ONNX-backed sentence embedder (384-dim output, mean pooling, L2
/// normalized).
pub struct OnnxEmbedder {
    session: Session,
    tokenizer: tokenizers::Tokenizer,
}

impl OnnxEmbedder {
    /// Load the model from `model_path`, falling back to the published
    /// MiniLM ONNX export when the local file is absent. The tokenizer is
    /// always loaded from `tokenizer_path`.
    pub fn load(model_path: &str, tokenizer_path: &str) -> Result<Self> {
        ort::init()
            .with_name("dataset-hub-embedder")
            .commit()
            .map_err(|e| anyhow!("failed to initialize ONNX Runtime: {}", e))?;

        let local_model_path = Path::new(model_path);
        let session = if local_model_path.exists() {
            Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level1)?
                .commit_from_file(local_model_path)
                .map_err(|e| anyhow!("failed to load ONNX model from {}: {}", model_path, e))?
        } else {
            Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level1)?
                .commit_from_url(MINILM_MODEL_URL)
                .map_err(|e| anyhow!("failed to fetch ONNX model: {}", e))?
        };

        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("failed to load tokenizer from {}: {}", tokenizer_path, e))?;

        Ok(Self { session, tokenizer })
    }
}

impl TextEmbedder for OnnxEmbedder {
    fn embed(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encodings = self
            .tokenizer
            .encode_batch(text_refs, true)
            .map_err(|e| anyhow!("failed to tokenize descriptions: {}", e))?;

        let batch = encodings.len();
        let length = encodings.iter().map(|e| e.len()).max().unwrap_or(0);

        // Pad every encoding to the longest one in the batch
        let mut ids = Vec::with_capacity(batch * length);
        let mut mask = Vec::with_capacity(batch * length);
        let mut type_ids = Vec::with_capacity(batch * length);
        for encoding in &encodings {
            let token_ids = encoding.get_ids();
            let attention = encoding.get_attention_mask();
            for i in 0..length {
                if i < token_ids.len() {
                    ids.push(token_ids[i] as i64);
                    mask.push(attention[i] as i64);
                } else {
                    ids.push(0);
                    mask.push(0);
                }
                type_ids.push(0);
            }
        }

        let attention_mask = mask.clone();

        let ids = Tensor::from_array(([batch, length], ids.into_boxed_slice()))?;
        let mask = Tensor::from_array(([batch, length], mask.into_boxed_slice()))?;
        let type_ids = Tensor::from_array(([batch, length], type_ids.into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids,
            "attention_mask" => mask,
            "token_type_ids" => type_ids
        ])?;

        let output = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("sentence_embedding"))
            .ok_or_else(|| anyhow!("model produced no embedding tensor"))?;

        let (shape, data) = output.try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

        match dims.as_slice() {
            // Token-level output: mean-pool over the attention mask
            [b, s, h] if *b == batch => {
                let hidden = ArrayView3::from_shape((*b, *s, *h), data)?;
                let mut results = Vec::with_capacity(batch);
                for i in 0..batch {
                    let mut pooled = vec![0.0f32; *h];
                    let mut count = 0.0f32;
                    for t in 0..(*s).min(length) {
                        if attention_mask[i * length + t] == 0 {
                            continue;
                        }
                        count += 1.0;
                        for d in 0..*h {
                            pooled[d] += hidden[[i, t, d]];
                        }
                    }
                    if count > 0.0 {
                        for value in &mut pooled {
                            *value /= count;
                        }
                    }
                    results.push(normalize(pooled));
                }
                Ok(results)
            }
            // Already-pooled output: one row per input
            [b, h] if *b == batch => Ok(data
                .chunks(*h)
                .map(|row| normalize(row.to_vec()))
                .collect()),
            other => Err(anyhow!("unexpected embedding tensor shape: {:?}", other)),
        }
    }
}

fn normalize(vector: Vec<f32>) -> Vec<f32> {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        vector.into_iter().map(|x| x / magnitude).collect()
    } else {
        vector
    }
}

/// Fixed-vector embedder for tests.
#[cfg(test)]
pub struct MockEmbedder {
    pub vectors: Vec<Vec<f32>>,
}

#[cfg(test)]
impl TextEmbedder for MockEmbedder {
    fn embed(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, _)| self.vectors[i % self.vectors.len()].clone())
            .collect())
    }
}
