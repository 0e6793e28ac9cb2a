//! Conversion pipeline: decode → overlay → encode → publish.
//!
//! Each run is independent and strictly sequential; the caller may run
//! any number of pipelines concurrently. All transient resources are
//! released on every exit path, including cancellation.

pub mod error;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{ConversionPipeline, PipelineConfig};
