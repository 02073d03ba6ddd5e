//! Outline generator client
//!
//! One call: (title, topic, slide count) in, raw outline out. The reply is
//! deliberately returned as untrusted text; the normalizer owns every
//! trust issue, so nothing here validates outline structure beyond
//! extracting the message content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::outline::RawOutline;

/// Maximum retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Errors from the outline generator
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The outline-generation surface the pipeline consumes
#[async_trait]
pub trait OutlineGenerator: Send + Sync {
    /// Produce a raw outline for a deck on `topic` with roughly `slide_count` slides
    async fn generate(&self, title: &str, topic: &str, slide_count: usize) -> Result<RawOutline, GeneratorError>;
}

/// Chat-completions outline generator
pub struct ChatOutlineGenerator {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl ChatOutlineGenerator {
    /// Create a generator from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GeneratorError::InvalidResponse(format!("{} is not set", config.api_key_env)))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GeneratorError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request_body(&self, title: &str, topic: &str, slide_count: usize) -> serde_json::Value {
        let prompt = format!(
            "Generate a presentation outline titled '{title}' about: {topic}. \
             Produce {slide_count} slides. Reply with ONLY a JSON array; each element has \
             \"type\" (TITLE, AGENDA, CONTENT, SUMMARY, or CLOSING), \"title\", and \
             \"content\" (an array of 3-5 bullet strings)."
        );
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }

    fn extract_content(body: ChatResponse) -> Result<String, GeneratorError> {
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GeneratorError::InvalidResponse("response carried no choices".to_string()))
    }
}

#[async_trait]
impl OutlineGenerator for ChatOutlineGenerator {
    async fn generate(&self, title: &str, topic: &str, slide_count: usize) -> Result<RawOutline, GeneratorError> {
        debug!(title, slide_count, "generate: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(title, topic, slide_count);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "generate: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "generate: network error");
                    last_error = Some(GeneratorError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let message = response.text().await.unwrap_or_default();
                debug!(attempt, status, "generate: retryable status");
                last_error = Some(GeneratorError::ApiError { status, message });
                continue;
            }

            if !response.status().is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(GeneratorError::ApiError { status, message });
            }

            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
            let content = Self::extract_content(parsed)?;
            debug!(content_len = content.len(), "generate: success");
            return Ok(RawOutline::Text(content));
        }

        Err(last_error.unwrap_or_else(|| GeneratorError::InvalidResponse("max retries exceeded".to_string())))
    }
}

// Chat-completions API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
