//! Pipeline error taxonomy.
//!
//! One variant per failed stage, each carrying the original filename
//! and the underlying media error. Publish failures are deliberately
//! absent: they degrade the outcome instead of failing the run.

use gifcast_media::MediaError;
use thiserror::Error;

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Terminal failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode '{filename}': {source}")]
    Decode {
        filename: String,
        source: MediaError,
    },

    #[error("failed to render caption onto '{filename}': {source}")]
    Render {
        filename: String,
        source: MediaError,
    },

    #[error("failed to encode '{filename}' as GIF: {source}")]
    Encode {
        filename: String,
        source: MediaError,
    },
}

impl PipelineError {
    /// The stage that failed, for logging.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::Render { .. } => "render",
            Self::Encode { .. } => "encode",
        }
    }

    /// Whether the failure is the caller's fault (bad input) rather
    /// than a processing fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Render { .. })
    }
}
