//! The conversion pipeline itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use gifcast_media::{burn_caption, encode_gif, open_clip, GifArtifact};
use gifcast_models::{ConvertOutcome, UploadRequest};
use gifcast_publish::GiphyClient;

use crate::error::{PipelineError, PipelineResult};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for transient GIF artifacts
    pub work_dir: PathBuf,
    /// Per-FFmpeg-invocation timeout in seconds
    pub ffmpeg_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp"),
            ffmpeg_timeout_secs: 120,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp")),
            ffmpeg_timeout_secs: std::env::var("FFMPEG_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
        }
    }
}

/// Removes the transient GIF when the run ends, however it ends.
///
/// Arming the guard right after encode means success, publish failure,
/// and mid-publish cancellation all leave the disk clean.
struct ArtifactGuard {
    path: PathBuf,
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to delete transient GIF {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Orchestrates one upload through decode, overlay, encode, publish.
pub struct ConversionPipeline {
    config: PipelineConfig,
    publisher: Arc<GiphyClient>,
}

impl ConversionPipeline {
    pub fn new(config: PipelineConfig, publisher: Arc<GiphyClient>) -> Self {
        Self { config, publisher }
    }

    /// Run the pipeline for one request.
    ///
    /// Exactly one terminal outcome: `Ok` with the local path and an
    /// optional remote URL, or a stage-specific error. At most one
    /// clip handle is alive between stages, and the transient GIF is
    /// gone from disk by the time this returns.
    pub async fn run(&self, request: &UploadRequest) -> PipelineResult<ConvertOutcome> {
        let filename = request.filename.as_str();
        let timeout = self.config.ffmpeg_timeout_secs;

        let source = open_clip(&request.video_bytes, filename)
            .await
            .map_err(|source| PipelineError::Decode {
                filename: filename.to_string(),
                source,
            })?;

        let captioned = burn_caption(&source, &request.caption, timeout)
            .await
            .map_err(|source| PipelineError::Render {
                filename: filename.to_string(),
                source,
            })?;
        // The source clip's temp file is no longer needed.
        drop(source);

        let artifact = encode_gif(&captioned, filename, &self.config.work_dir, timeout)
            .await
            .map_err(|source| PipelineError::Encode {
                filename: filename.to_string(),
                source,
            })?;
        drop(captioned);

        let _guard = ArtifactGuard {
            path: artifact.local_path.clone(),
        };

        let giphy_url = self.publish_artifact(&artifact, filename).await;

        info!(
            "Pipeline finished for '{}': local={}, remote={:?}",
            filename,
            artifact.local_path.display(),
            giphy_url
        );

        Ok(ConvertOutcome {
            gif_path: artifact.local_path.to_string_lossy().into_owned(),
            giphy_url,
        })
    }

    /// Attempt the publish step. A failure here is logged and mapped
    /// to `None`; the caller still gets a successful, degraded outcome.
    async fn publish_artifact(&self, artifact: &GifArtifact, filename: &str) -> Option<String> {
        let gif_name = artifact
            .local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.gif".to_string());

        let bytes = match tokio::fs::read(&artifact.local_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read artifact for '{}': {}", filename, e);
                return None;
            }
        };

        match self.publisher.publish(bytes, &gif_name).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                warn!("Publisher produced no URL for '{}'", filename);
                None
            }
            Err(e) => {
                warn!("Publishing '{}' failed: {}", filename, e);
                None
            }
        }
    }

    /// Verify the external tooling is present, so a missing FFmpeg
    /// surfaces at startup instead of on the first request.
    pub fn preflight(&self) -> Result<(), gifcast_media::MediaError> {
        gifcast_media::check_ffmpeg()?;
        gifcast_media::check_ffprobe()?;
        Ok(())
    }

    /// Deterministic transient path the run for `filename` will use.
    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        gifcast_media::gif_output_path(&self.config.work_dir, filename)
    }

    /// Directory transient artifacts are written to.
    pub fn work_dir(&self) -> &Path {
        &self.config.work_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gifcast_publish::PublisherConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_pipeline(server_uri: &str, work_dir: PathBuf) -> ConversionPipeline {
        let mut publisher_config = PublisherConfig::new("test-key");
        publisher_config.upload_url = format!("{server_uri}/v1/gifs");
        let publisher = Arc::new(GiphyClient::new(publisher_config).unwrap());

        ConversionPipeline::new(
            PipelineConfig {
                work_dir,
                ffmpeg_timeout_secs: 30,
            },
            publisher,
        )
    }

    #[tokio::test]
    async fn test_empty_payload_fails_at_decode() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline("http://127.0.0.1:1", dir.path().to_path_buf());

        let request = UploadRequest::new(Vec::new(), "clip.mp4", "hello");
        let err = pipeline.run(&request).await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_garbage_payload_fails_at_decode() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline("http://127.0.0.1:1", dir.path().to_path_buf());

        let request = UploadRequest::new(b"definitely not a video".to_vec(), "clip.mp4", "hi");
        let err = pipeline.run(&request).await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_publish_step_success_and_cleanup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/gifs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "url": "https://example/x.gif" }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&server.uri(), dir.path().to_path_buf());

        let gif_path = dir.path().join("clip.mp4.gif");
        std::fs::write(&gif_path, b"GIF89a").unwrap();
        let artifact = GifArtifact {
            local_path: gif_path.clone(),
            size_bytes: 6,
        };

        let url = pipeline.publish_artifact(&artifact, "clip.mp4").await;
        assert_eq!(url.as_deref(), Some("https://example/x.gif"));

        // Cleanup is the guard's job.
        drop(ArtifactGuard {
            path: gif_path.clone(),
        });
        assert!(!gif_path.exists());
    }

    #[tokio::test]
    async fn test_publish_failure_degrades_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/gifs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad key"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&server.uri(), dir.path().to_path_buf());

        let gif_path = dir.path().join("clip.mp4.gif");
        std::fs::write(&gif_path, b"GIF89a").unwrap();
        let artifact = GifArtifact {
            local_path: gif_path,
            size_bytes: 6,
        };

        assert_eq!(pipeline.publish_artifact(&artifact, "clip.mp4").await, None);
    }

    #[test]
    fn test_artifact_guard_tolerates_missing_file() {
        // Must not panic when the file is already gone.
        drop(ArtifactGuard {
            path: PathBuf::from("/tmp/gifcast-test-never-existed.gif"),
        });
    }

    #[test]
    fn test_artifact_path_is_per_filename() {
        let pipeline = test_pipeline("http://127.0.0.1:1", PathBuf::from("/tmp"));
        assert_eq!(
            pipeline.artifact_path("a.mp4"),
            PathBuf::from("/tmp/a.mp4.gif")
        );
        assert_ne!(pipeline.artifact_path("a.mp4"), pipeline.artifact_path("b.mp4"));
    }
}
