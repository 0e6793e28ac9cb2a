//! Publisher configuration.

use std::time::Duration;

use crate::error::{PublishError, PublishResult};

/// Default Giphy upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.giphy.com/v1/gifs";

/// Configuration for the Giphy client.
///
/// Loaded once at process start; read-only thereafter.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Giphy API credential
    pub api_key: String,
    /// Upload endpoint
    pub upload_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries after the first attempt (baseline: 0, single shot)
    pub max_retries: u32,
}

impl PublisherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
        }
    }

    /// Create config from environment variables. Fails when the
    /// credential is absent: the publisher cannot run without it.
    pub fn from_env() -> PublishResult<Self> {
        let api_key = std::env::var("GIPHY_API_KEY").map_err(|_| PublishError::MissingApiKey)?;

        Ok(Self {
            api_key,
            upload_url: std::env::var("GIPHY_UPLOAD_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("PUBLISH_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("PUBLISH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        })
    }
}
