//! Giphy upload HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PublisherConfig;
use crate::error::{PublishError, PublishResult};

/// Giphy upload response shape: `{"data": {"url": "..."}}`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
}

/// Client for the Giphy upload endpoint.
pub struct GiphyClient {
    http: Client,
    config: PublisherConfig,
}

impl GiphyClient {
    /// Create a new client.
    pub fn new(config: PublisherConfig) -> PublishResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PublishError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PublishResult<Self> {
        Self::new(PublisherConfig::from_env()?)
    }

    /// Upload a GIF and return its public URL.
    ///
    /// `Ok(None)` means Giphy accepted the request but produced no
    /// URL (response without a `data` field); that is a degraded
    /// outcome, not an error. Network failures, timeouts, non-2xx
    /// statuses, and unparseable bodies are `Err`.
    pub async fn publish(&self, gif_bytes: Vec<u8>, filename: &str) -> PublishResult<Option<String>> {
        debug!(
            "Publishing {} ({} bytes) to {}",
            filename,
            gif_bytes.len(),
            self.config.upload_url
        );

        let response = self
            .with_retry(|| async {
                let part = Part::bytes(gif_bytes.clone())
                    .file_name(filename.to_string())
                    .mime_str("image/gif")
                    .map_err(PublishError::Network)?;

                let form = Form::new()
                    .part("file", part)
                    .text("api_key", self.config.api_key.clone());

                let response = self
                    .http
                    .post(&self.config.upload_url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(PublishError::Network)?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(PublishError::RequestFailed { status, body });
                }

                Ok(response)
            })
            .await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        Ok(body.data.and_then(|d| d.url))
    }

    /// Execute with bounded exponential backoff.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> PublishResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PublishResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Upload failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| PublishError::InvalidResponse("no attempts made".to_string())))
    }
}
