//! Google ID token authentication and the access gate.
//!
//! Tokens already known to the user store pass without a network
//! round-trip; unknown tokens are verified against Google's public
//! signing keys and cached as a new user record.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use gifcast_models::UserRecord;
use gifcast_store::StoreError;

use crate::error::ApiError;
use crate::state::AppState;

/// Google JWKS URL for OAuth2 ID tokens.
const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Accepted ID token issuers.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// JWKS cache TTL.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// Decoded Google ID token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleClaims {
    /// Subject (Google account ID)
    pub sub: String,
    /// Email (if the email scope was granted)
    pub email: Option<String>,
    /// Issuer
    pub iss: String,
    /// Audience (our OAuth client ID)
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// JWKS response from Google.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

/// Verifies Google ID tokens against cached JWKS keys.
///
/// Keys are fetched lazily on first use and refreshed after the TTL
/// elapses, so constructing the verifier never touches the network.
pub struct GoogleTokenVerifier {
    http: Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
    client_id: String,
    jwks_url: String,
}

impl GoogleTokenVerifier {
    /// Create a verifier for tokens issued to `client_id`.
    pub fn new(client_id: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
            client_id: client_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
        }
    }

    /// Create from the `GOOGLE_CLIENT_ID` environment variable.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID")?;
        Ok(Self::new(client_id))
    }

    /// Refresh JWKS keys from Google.
    async fn refresh_keys(&self) -> Result<(), ApiError> {
        debug!("Refreshing Google JWKS keys");

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| ApiError::internal(format!("JWKS fetch failed: {e}")))?;

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| ApiError::internal(format!("JWKS parse failed: {e}")))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
                .map_err(|e| ApiError::internal(format!("Bad JWKS key: {e}")))?;
            keys.insert(jwk.kid, key);
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;
        *self.last_refresh.write().await = Some(Instant::now());

        debug!("Cached {} Google JWKS keys", key_count);
        Ok(())
    }

    /// Get decoding key for a key ID, refreshing the cache when stale.
    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        let needs_refresh = match *self.last_refresh.read().await {
            Some(last) => last.elapsed() > JWKS_CACHE_TTL,
            None => true,
        };

        if needs_refresh {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        self.keys.read().await.get(kid).cloned()
    }

    /// Verify a Google ID token.
    pub async fn verify_token(&self, token: &str) -> Result<GoogleClaims, ApiError> {
        let header = decode_header(token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token header: {e}")))?;

        let kid = header
            .kid
            .ok_or_else(|| ApiError::unauthorized("Token missing key ID"))?;

        let key = self
            .get_key(&kid)
            .await
            .ok_or_else(|| ApiError::unauthorized("Unknown key ID"))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_audience(&[&self.client_id]);

        let token_data = decode::<GoogleClaims>(token, &key, &validation)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {e}")))?;

        Ok(token_data.claims)
    }
}

/// Extract the bearer token from request headers.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))
}

/// Authenticated user resolved by the access gate.
#[derive(Debug, Clone)]
pub struct Authenticated(pub UserRecord);

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        // Known token: no verification round-trip.
        if let Some(user) = state.users.find_by_token(token).await? {
            return Ok(Self(user));
        }

        let claims = state.verifier.verify_token(token).await?;
        let email = claims
            .email
            .ok_or_else(|| ApiError::unauthorized("Token carries no email claim"))?;

        info!("Creating user record for {}", email);
        match state.users.insert(UserRecord::new(email, token)).await {
            Ok(user) => Ok(Self(user)),
            // Lost a race with a concurrent request holding the same token.
            Err(StoreError::DuplicateToken) => state
                .users
                .find_by_token(token)
                .await?
                .map(Self)
                .ok_or_else(|| ApiError::internal("User record disappeared")),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert("Authorization", HeaderValue::from_static("tok123"));
        assert!(bearer_token(&headers).is_err());

        headers.insert("Authorization", HeaderValue::from_static("Bearer tok123"));
        assert_eq!(bearer_token(&headers).unwrap(), "tok123");
    }

    #[tokio::test]
    async fn test_malformed_token_rejected_without_network() {
        let verifier = GoogleTokenVerifier::new("client-id");
        let err = verifier.verify_token("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
