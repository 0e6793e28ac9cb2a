#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the gifcast conversion pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeouts and cancellation
//! - Decoding an uploaded byte stream into a probed, temp-file-backed clip
//! - Burning a fixed-style caption into every frame (drawtext)
//! - Encoding a clip to an animated GIF with palette generation

pub mod command;
pub mod decode;
pub mod error;
pub mod gif;
pub mod overlay;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use decode::{open_clip, Clip};
pub use error::{MediaError, MediaResult};
pub use gif::{encode_gif, gif_output_path, sanitize_filename, GifArtifact};
pub use overlay::burn_caption;
pub use probe::{probe_video, VideoInfo};
