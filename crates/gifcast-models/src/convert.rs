//! Conversion request and outcome models.

use serde::{Deserialize, Serialize};

/// One uploaded video plus its caption.
///
/// Owned exclusively by a single pipeline invocation; nothing here is
/// shared or retained across requests.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Raw video bytes as received from the multipart form.
    pub video_bytes: Vec<u8>,
    /// Client-supplied filename; used to derive the transient GIF name.
    pub filename: String,
    /// Caption burned into every frame.
    pub caption: String,
}

impl UploadRequest {
    pub fn new(
        video_bytes: Vec<u8>,
        filename: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            video_bytes,
            filename: filename.into(),
            caption: caption.into(),
        }
    }
}

/// Terminal result of a successful pipeline run.
///
/// `giphy_url` is `None` when publishing failed or the publisher
/// produced no URL; the local path is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    /// Transient path the GIF was encoded to.
    pub gif_path: String,
    /// Public URL returned by the publisher, if any.
    pub giphy_url: Option<String>,
}

/// Wire response for `POST /upload-video/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub gif_url: String,
    pub giphy_url: Option<String>,
}

impl From<ConvertOutcome> for ConvertResponse {
    fn from(outcome: ConvertOutcome) -> Self {
        Self {
            gif_url: outcome.gif_path,
            giphy_url: outcome.giphy_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_null_giphy_url() {
        let response = ConvertResponse {
            gif_url: "/tmp/clip.mp4.gif".to_string(),
            giphy_url: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["gif_url"], "/tmp/clip.mp4.gif");
        assert!(json["giphy_url"].is_null());
    }

    #[test]
    fn test_outcome_to_response() {
        let outcome = ConvertOutcome {
            gif_path: "/tmp/a.gif".to_string(),
            giphy_url: Some("https://example/x.gif".to_string()),
        };

        let response = ConvertResponse::from(outcome);
        assert_eq!(response.gif_url, "/tmp/a.gif");
        assert_eq!(response.giphy_url.as_deref(), Some("https://example/x.gif"));
    }
}
