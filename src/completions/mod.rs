// Chat completion client
// Thin wrapper over an OpenAI-compatible chat completions endpoint

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;

const SYSTEM_PROMPT: &str = "You are a helpful and friendly chatbot assistant.";

#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_base: Url,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl CompletionClient {
    /// Create a client that uses the provider's default sampling settings.
    #[inline]
    pub fn new(config: &Config) -> Self {
        Self {
            api_base: config.openai.api_base.clone(),
            api_key: config
                .secrets
                .openai_api_key
                .clone()
                .unwrap_or_default(),
            model: config.openai.completion_model.clone(),
            max_tokens: None,
            temperature: None,
            client: reqwest::Client::new(),
        }
    }

    /// Cap the response length and set the sampling temperature.
    #[inline]
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = Some(max_tokens);
        self.temperature = Some(temperature);
        self
    }

    /// Request a completion for the supplied content under the fixed system
    /// instruction and return the first choice's text. No retry.
    #[inline]
    pub async fn complete(&self, content: &str) -> Result<String> {
        let url = self
            .api_base
            .join("/v1/chat/completions")
            .context("Failed to build chat completions URL")?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: content.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("Requesting completion ({} chars of content)", content.len());

        let response: ChatResponse = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach completion provider")?
            .error_for_status()
            .context("Completion provider returned an error status")?
            .json()
            .await
            .context("Failed to parse completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("Completion response contained no choices"))
    }
}
