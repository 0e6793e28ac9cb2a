//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, login, root, subscribe, upload_video};
use crate::middleware::{cors_layer, rate_limit, request_id, request_logging, RateLimiterCache};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload-video/", post(upload_video))
        .route("/login/", post(login))
        .route("/subscribe/", post(subscribe))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                let limiter = Arc::clone(&limiter);
                async move { rate_limit(limiter, req, next).await }
            },
        ))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
