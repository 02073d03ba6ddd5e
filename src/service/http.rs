//! HTTP client for the presentation-authoring service
//!
//! Requests carry a bearer token and a bounded timeout. Page reads retry
//! on transient statuses with exponential backoff; batch updates are
//! submitted exactly once because slide creation is not idempotent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{BatchReply, Page, ServiceError, SlidesService};
use crate::config::SlidesConfig;

/// Maximum retries for transient errors on safe (read) calls
const MAX_READ_RETRIES: u32 = 3;

/// Initial backoff delay for read retries
const INITIAL_BACKOFF_MS: u64 = 500;

/// Check if an HTTP status code is transient
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Authoring service client over HTTP
pub struct HttpSlidesService {
    base_url: String,
    token: String,
    http: Client,
}

impl HttpSlidesService {
    /// Create a client from configuration
    ///
    /// Reads the access token from the environment variable named in config.
    pub fn from_config(config: &SlidesConfig) -> Result<Self, ServiceError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let token = std::env::var(&config.token_env)
            .map_err(|_| ServiceError::InvalidReply(format!("{} is not set", config.token_env)))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ServiceError::Network)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            token,
            http,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(response);
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ServiceError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        let message = response.text().await.unwrap_or_default();
        Err(ServiceError::ApiError { status, message })
    }
}

#[async_trait]
impl SlidesService for HttpSlidesService {
    async fn create_presentation(&self, title: &str) -> Result<String, ServiceError> {
        debug!(title, "create_presentation: called");
        let url = format!("{}/v1/presentations", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: Value = response.json().await?;
        let id = body
            .get("presentationId")
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::InvalidReply("reply missing presentationId".to_string()))?;

        debug!(presentation_id = %id, "create_presentation: created");
        Ok(id.to_string())
    }

    async fn batch_update(&self, presentation_id: &str, requests: &[Value]) -> Result<BatchReply, ServiceError> {
        debug!(presentation_id, request_count = requests.len(), "batch_update: called");
        let url = format!("{}/v1/presentations/{}:batchUpdate", self.base_url, presentation_id);

        // Submitted exactly once. A resubmitted creation batch would create
        // duplicate slides; retry policy belongs to the caller.
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "requests": requests }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let reply: BatchReply = response.json().await?;
        debug!(reply_count = reply.replies.len(), "batch_update: applied");
        Ok(reply)
    }

    async fn get_page(&self, presentation_id: &str, page_id: &str) -> Result<Page, ServiceError> {
        debug!(presentation_id, page_id, "get_page: called");
        let url = format!(
            "{}/v1/presentations/{}/pages/{}",
            self.base_url, presentation_id, page_id
        );

        let mut last_error = None;
        for attempt in 0..=MAX_READ_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "get_page: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.get(&url).bearer_auth(&self.token).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "get_page: network error");
                    last_error = Some(ServiceError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt < MAX_READ_RETRIES {
                let message = response.text().await.unwrap_or_default();
                debug!(attempt, status, "get_page: retryable status");
                last_error = Some(ServiceError::ApiError { status, message });
                continue;
            }

            let response = Self::check_status(response).await?;
            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or_else(|| ServiceError::InvalidReply("max retries exceeded".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(408));
        assert!(!is_retryable_status(200));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
    }
}
