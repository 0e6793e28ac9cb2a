//! Login and subscription handlers.

use axum::Json;

use gifcast_models::UserRecord;

use crate::auth::Authenticated;

/// `POST /login/` — the extractor does the work: store lookup, Google
/// verification on miss, record creation. The handler just echoes the
/// resolved user.
pub async fn login(Authenticated(user): Authenticated) -> Json<UserRecord> {
    Json(user)
}

/// `POST /subscribe/` — gated stub; no subscription state exists yet.
pub async fn subscribe(Authenticated(_user): Authenticated) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Subscription success" }))
}
