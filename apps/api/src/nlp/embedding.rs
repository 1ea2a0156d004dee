//! Sentence embeddings over an OpenAI-compatible `/embeddings` endpoint,
//! plus the cosine similarity used as the semantic score.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Embedder, EmbeddingError};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for a hosted or local embedding model (Ollama, vLLM, OpenAI, ...).
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbedder {
    /// Builds the client and embeds a probe string, so a missing model or a
    /// dead endpoint fails at startup instead of on the first screening.
    pub async fn connect(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut embedder = Self {
            client,
            endpoint,
            model,
            api_key,
            dimension: 0,
        };

        let probe = embedder.request("embedding model probe").await?;
        embedder.dimension = probe.len();
        info!(
            "Embedding model '{}' ready at {} (dimension {})",
            embedder.model, embedder.endpoint, embedder.dimension
        );
        Ok(embedder)
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!("Calling embeddings API: {}", self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&EmbeddingRequest {
                input: text,
                model: &self.model,
            });
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let result: EmbeddingResponse = response.json().await?;
        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or(EmbeddingError::Empty)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vector = self.request(text).await?;
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                left: self.dimension,
                right: vector.len(),
            });
        }
        Ok(vector)
    }
}

/// Cosine similarity in [-1, 1]. A zero vector has no direction and scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Embeds `resume_text` and compares it with an already embedded job
/// description.
pub async fn semantic_similarity(
    embedder: &dyn Embedder,
    job_embedding: &[f32],
    resume_text: &str,
) -> Result<f64, EmbeddingError> {
    let resume = embedder.embed(resume_text).await?;
    cosine_similarity(job_embedding, &resume)
}
