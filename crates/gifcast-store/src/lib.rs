//! Token-keyed user store.
//!
//! Persistence is an external collaborator of the conversion core, so
//! it lives behind the [`UserStore`] trait; the in-memory backend is
//! the only one shipped here.

pub mod error;
pub mod memory;

use async_trait::async_trait;

use gifcast_models::UserRecord;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryUserStore;

/// A simple keyed store: token → user record, unique on token.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by their identity token.
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert a new user. Fails if the token is already present.
    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord>;
}
