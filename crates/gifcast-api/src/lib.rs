//! Axum HTTP API server.
//!
//! This crate provides:
//! - The `/upload-video/` conversion endpoint
//! - Google ID token verification with a local user store
//! - Rate limiting, request ids, and CORS

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
