//! Animated GIF encoding with palette generation.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::decode::Clip;
use crate::error::{MediaError, MediaResult};

/// Single-invocation palette filter: downsample to 12 fps and 480 px
/// wide, generate a palette from one branch, apply it to the other.
const GIF_FILTER: &str =
    "fps=12,scale=480:-2:flags=lanczos,split[a][b];[a]palettegen[p];[b][p]paletteuse";

/// The encoded GIF file produced for one pipeline run.
///
/// A plain handle: deletion after publish is the pipeline's job, not
/// the encoder's.
#[derive(Debug, Clone)]
pub struct GifArtifact {
    pub local_path: PathBuf,
    pub size_bytes: u64,
}

/// Deterministic transient output path for an upload's GIF.
///
/// Repeated uploads of the same filename map to the same path and
/// overwrite a prior unpublished artifact rather than accumulating.
pub fn gif_output_path(out_dir: &Path, original_filename: &str) -> PathBuf {
    out_dir.join(format!("{}.gif", sanitize_filename(original_filename)))
}

/// Sanitize a client-supplied filename for filesystem use.
///
/// Strips any path components and maps everything outside
/// `[A-Za-z0-9._-]` to `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Dot-only names would vanish into the ".gif" suffix.
    if sanitized.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

/// Removes a half-written output file unless the encode completed.
///
/// A killed or failed FFmpeg can leave a partial file at the
/// deterministic path; dropping this undisarmed — on an error return
/// or mid-encode cancellation — deletes it.
struct PendingOutput {
    path: PathBuf,
    keep: bool,
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to delete partial GIF {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Encode a clip to an animated GIF at its deterministic path.
///
/// On any failure the output path is left clean; a successfully
/// encoded file is the pipeline's to delete after publish.
pub async fn encode_gif(
    clip: &Clip,
    original_filename: &str,
    out_dir: &Path,
    timeout_secs: u64,
) -> MediaResult<GifArtifact> {
    if clip.info().duration <= 0.0 {
        return Err(MediaError::invalid_video("clip has no frames to encode"));
    }

    tokio::fs::create_dir_all(out_dir).await?;
    let output = gif_output_path(out_dir, original_filename);
    let mut pending = PendingOutput {
        path: output.clone(),
        keep: false,
    };

    let cmd = FfmpegCommand::new(clip.path(), &output).filter_complex(GIF_FILTER);
    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    let size_bytes = tokio::fs::metadata(&output).await.map(|m| m.len()).unwrap_or(0);
    if size_bytes == 0 {
        return Err(MediaError::ffmpeg_failed(
            format!("GIF encoding produced no output at {}", output.display()),
            None,
            None,
        ));
    }

    pending.keep = true;

    info!(
        "Encoded GIF: {} ({} bytes)",
        output.display(),
        size_bytes
    );

    Ok(GifArtifact {
        local_path: output,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("clip.mp4"), "clip.mp4");
        assert_eq!(sanitize_filename("my clip (1).mov"), "my_clip__1_.mov");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn test_gif_output_path_is_deterministic() {
        let dir = Path::new("/tmp");
        let a = gif_output_path(dir, "clip.mp4");
        let b = gif_output_path(dir, "clip.mp4");
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/tmp/clip.mp4.gif"));

        let c = gif_output_path(dir, "other.mp4");
        assert_ne!(a, c);
    }

    #[test]
    fn test_gif_output_path_strips_directories() {
        let path = gif_output_path(Path::new("/tmp"), "../../escape.mp4");
        assert_eq!(path, PathBuf::from("/tmp/escape.mp4.gif"));
    }

    #[test]
    fn test_pending_output_deletes_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.gif");

        std::fs::write(&path, b"partial").unwrap();
        drop(PendingOutput {
            path: path.clone(),
            keep: false,
        });
        assert!(!path.exists());

        std::fs::write(&path, b"complete").unwrap();
        drop(PendingOutput {
            path: path.clone(),
            keep: true,
        });
        assert!(path.exists());
    }

    #[test]
    fn test_pending_output_tolerates_missing_file() {
        // Must not panic when FFmpeg never created the output.
        drop(PendingOutput {
            path: PathBuf::from("/tmp/gifcast-test-never-written.gif"),
            keep: false,
        });
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_work_dir_empty() {
        let work_dir = tempfile::tempdir().unwrap();

        // A garbage "clip" makes FFmpeg fail mid-encode; without
        // FFmpeg installed the run fails even earlier. Either way no
        // partial output may survive the error return.
        let temp = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        std::fs::write(&temp, b"not a video").unwrap();
        let clip = Clip::new(
            temp,
            crate::probe::VideoInfo {
                duration: 1.0,
                width: 640,
                height: 360,
                fps: 30.0,
            },
        );

        let result = encode_gif(&clip, "clip.mp4", work_dir.path(), 30).await;
        assert!(result.is_err());

        let leftovers: Vec<_> = std::fs::read_dir(work_dir.path())
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }
}
