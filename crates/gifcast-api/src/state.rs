//! Application state.

use std::sync::Arc;

use gifcast_pipeline::{ConversionPipeline, PipelineConfig};
use gifcast_publish::GiphyClient;
use gifcast_store::{MemoryUserStore, UserStore};

use crate::auth::GoogleTokenVerifier;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<ConversionPipeline>,
    pub users: Arc<dyn UserStore>,
    pub verifier: Arc<GoogleTokenVerifier>,
}

impl AppState {
    /// Create application state from process-wide configuration.
    ///
    /// Fails fast when the publisher credential or the Google client
    /// ID is missing; both are load-once, read-only thereafter.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let publisher = Arc::new(GiphyClient::from_env()?);
        let pipeline = Arc::new(ConversionPipeline::new(
            PipelineConfig::from_env(),
            publisher,
        ));
        let verifier = Arc::new(GoogleTokenVerifier::from_env()?);

        Ok(Self {
            config,
            pipeline,
            users: Arc::new(MemoryUserStore::new()),
            verifier,
        })
    }
}
