//! Decoding an uploaded byte stream into a frame-addressable clip.

use std::path::Path;

use tempfile::TempPath;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};

/// A decoded video backed by a transient file.
///
/// Ownership is linear: decoder → overlay → encoder. The backing temp
/// file is deleted when the `Clip` is dropped, so a stage that hands
/// its clip on must not keep reading the old handle.
#[derive(Debug)]
pub struct Clip {
    temp: TempPath,
    info: VideoInfo,
}

impl Clip {
    pub(crate) fn new(temp: TempPath, info: VideoInfo) -> Self {
        Self { temp, info }
    }

    /// Path to the backing transient file.
    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Probed timing and geometry metadata.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }
}

/// Open an uploaded video as a `Clip`.
///
/// FFmpeg needs file-backed input, so the bytes are materialized to a
/// temp file owned by the returned clip. Fails if the upload is empty,
/// is not a recognizable container, or has no playable video stream.
pub async fn open_clip(video_bytes: &[u8], filename: &str) -> MediaResult<Clip> {
    if video_bytes.is_empty() {
        return Err(MediaError::EmptyInput);
    }

    // Keep the original extension so FFmpeg's format detection has a hint.
    let suffix = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| ".bin".to_string());

    let temp = tempfile::Builder::new()
        .prefix("gifcast-upload-")
        .suffix(&suffix)
        .tempfile()?
        .into_temp_path();

    tokio::fs::write(&temp, video_bytes).await?;

    let info = match probe_video(&temp).await {
        Ok(info) => info,
        Err(MediaError::FfprobeFailed { stderr, .. }) => {
            return Err(MediaError::invalid_video(format!(
                "'{}' is not a decodable video: {}",
                filename,
                stderr.unwrap_or_default().trim()
            )));
        }
        Err(e) => return Err(e),
    };

    if info.duration <= 0.0 {
        return Err(MediaError::invalid_video(format!(
            "'{}' has zero duration",
            filename
        )));
    }

    debug!(
        "Decoded '{}': {:.2}s {}x{} @ {:.2}fps",
        filename, info.duration, info.width, info.height, info.fps
    );

    Ok(Clip::new(temp, info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_upload_rejected_before_probe() {
        let err = open_clip(&[], "clip.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::EmptyInput));
    }

    #[tokio::test]
    async fn test_clip_drop_removes_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let path = temp.to_path_buf();
        std::fs::write(&path, b"x").unwrap();

        let clip = Clip::new(
            temp,
            VideoInfo {
                duration: 1.0,
                width: 2,
                height: 2,
                fps: 1.0,
            },
        );
        assert!(clip.path().exists());
        drop(clip);
        assert!(!path.exists());
    }
}
