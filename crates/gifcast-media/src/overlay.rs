//! Caption overlay via FFmpeg drawtext.
//!
//! The caption policy is fixed: DejaVu Sans Bold, 48 px, white fill on
//! a half-opaque black box, centered horizontally, 40 px above the
//! bottom edge, identical on every frame.

use std::path::Path;

use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::decode::Clip;
use crate::error::{MediaError, MediaResult};

/// Preferred caption font; falls back to fontconfig lookup when absent.
const DEJAVU_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

const FONT_SIZE: u32 = 48;
const BOTTOM_MARGIN: u32 = 40;

/// Burn `caption` into every frame of `clip`.
///
/// The input clip is not touched; a new temp-file-backed clip is
/// returned and the caller is responsible for dropping the original.
pub async fn burn_caption(clip: &Clip, caption: &str, timeout_secs: u64) -> MediaResult<Clip> {
    if caption.trim().is_empty() {
        return Err(MediaError::EmptyCaption);
    }
    if clip.info().duration <= 0.0 {
        return Err(MediaError::invalid_video("clip has zero duration"));
    }

    let output = tempfile::Builder::new()
        .prefix("gifcast-overlay-")
        .suffix(".mp4")
        .tempfile()?
        .into_temp_path();

    let filter = caption_filter(caption);
    debug!("Applying caption overlay: {}", filter);

    let cmd = FfmpegCommand::new(clip.path(), &output)
        .video_filter(filter)
        .video_codec("libx264")
        .output_args(["-preset", "veryfast", "-crf", "23"])
        .no_audio();

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    Ok(Clip::new(output, clip.info().clone()))
}

/// Build the drawtext filter string for a caption.
fn caption_filter(caption: &str) -> String {
    format!(
        "drawtext={}:text='{}':fontsize={}:fontcolor=white:\
         box=1:boxcolor=black@0.5:boxborderw=12:\
         x=(w-text_w)/2:y=h-text_h-{}",
        font_option(),
        escape_drawtext(caption),
        FONT_SIZE,
        BOTTOM_MARGIN,
    )
}

/// Pick a concrete font file when available, fontconfig otherwise.
fn font_option() -> String {
    if Path::new(DEJAVU_BOLD).exists() {
        format!("fontfile={DEJAVU_BOLD}")
    } else {
        "font=Sans".to_string()
    }
}

/// Escape caption text for use inside a drawtext `text=` option.
///
/// FFmpeg parses the filtergraph in layers, so `\`, `'`, `:`, `%`,
/// `,`, `;`, `[` and `]` must all be escaped. Line breaks collapse to
/// spaces; captions are single-line by policy.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            ':' => escaped.push_str("\\:"),
            '%' => escaped.push_str("\\%"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '[' => escaped.push_str("\\["),
            ']' => escaped.push_str("\\]"),
            '\n' | '\r' => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::VideoInfo;

    fn fake_clip(duration: f64) -> Clip {
        let temp = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        Clip::new(
            temp,
            VideoInfo {
                duration,
                width: 640,
                height: 360,
                fps: 30.0,
            },
        )
    }

    #[tokio::test]
    async fn test_empty_caption_rejected() {
        let clip = fake_clip(5.0);
        let err = burn_caption(&clip, "   ", 10).await.unwrap_err();
        assert!(matches!(err, MediaError::EmptyCaption));
    }

    #[tokio::test]
    async fn test_zero_duration_clip_rejected() {
        let clip = fake_clip(0.0);
        let err = burn_caption(&clip, "hello", 10).await.unwrap_err();
        assert!(matches!(err, MediaError::InvalidVideo(_)));
    }

    #[test]
    fn test_escape_drawtext() {
        assert_eq!(escape_drawtext("plain text"), "plain text");
        assert_eq!(escape_drawtext("it's 100%"), "it\\'s 100\\%");
        assert_eq!(escape_drawtext("a:b,c;d"), "a\\:b\\,c\\;d");
        assert_eq!(escape_drawtext("back\\slash"), "back\\\\slash");
        assert_eq!(escape_drawtext("two\nlines"), "two lines");
    }

    #[test]
    fn test_caption_filter_shape() {
        let filter = caption_filter("hi there");
        assert!(filter.starts_with("drawtext="));
        assert!(filter.contains("text='hi there'"));
        assert!(filter.contains("fontsize=48"));
        assert!(filter.contains("x=(w-text_w)/2"));
        assert!(filter.contains("y=h-text_h-40"));
    }
}
