#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::embeddings::chunking::{TOKEN_BUDGET_MARGIN, pack_words};

#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    api_base: Url,
    api_key: String,
    model: String,
    token_limit: usize,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    #[inline]
    pub fn new(config: &Config) -> Self {
        Self {
            api_base: config.openai.api_base.clone(),
            api_key: config
                .secrets
                .openai_api_key
                .clone()
                .unwrap_or_default(),
            model: config.openai.embedding_model.clone(),
            token_limit: config.openai.embedding_token_limit,
            client: reqwest::Client::new(),
        }
    }

    #[inline]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[inline]
    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    /// Embed arbitrary-length text into one fixed-dimension vector.
    ///
    /// The text is packed into token-bounded chunks, each chunk is embedded
    /// with a separate provider call (strictly sequential), and the chunk
    /// vectors are averaged element-wise with equal weight.
    ///
    /// Provider failures do not propagate: the cause is logged and an EMPTY
    /// vector is returned. Callers must treat a zero-length vector as the
    /// failure signal.
    #[inline]
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        match self.try_embed(text).await {
            Ok(embedding) => embedding,
            Err(error) => {
                warn!("Error getting embeddings: {:#}", error);
                Vec::new()
            }
        }
    }

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let budget = self.token_limit.saturating_sub(TOKEN_BUDGET_MARGIN);
        let chunks = pack_words(text, budget);

        debug!(
            "Embedding text of {} chars in {} chunks",
            text.chars().count(),
            chunks.len()
        );

        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let embedding = self
                .request_embedding(chunk)
                .await
                .context("Embedding request failed")?;
            embeddings.push(embedding);
        }

        Ok(average(&embeddings))
    }

    async fn request_embedding(&self, input: &str) -> Result<Vec<f32>> {
        let url = self
            .api_base
            .join("/v1/embeddings")
            .context("Failed to build embeddings URL")?;

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: input.to_string(),
        };

        let response: EmbeddingResponse = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach embedding provider")?
            .error_for_status()
            .context("Embedding provider returned an error status")?
            .json()
            .await
            .context("Failed to parse embedding response")?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| anyhow::anyhow!("Embedding response contained no data"))
    }
}

/// Element-wise arithmetic mean of equal-dimension vectors, each input
/// weighted equally regardless of the chunk size it came from.
pub(crate) fn average(embeddings: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = embeddings.first() else {
        return Vec::new();
    };

    let dimensions = first.len();
    let mut averaged = vec![0.0f32; dimensions];

    for embedding in embeddings {
        for (slot, value) in averaged.iter_mut().zip(embedding.iter()) {
            *slot += value;
        }
    }

    let count = embeddings.len() as f32;
    for slot in &mut averaged {
        *slot /= count;
    }

    averaged
}
