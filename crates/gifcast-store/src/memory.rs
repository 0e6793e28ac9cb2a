//! In-memory user store backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use gifcast_models::UserRecord;

use crate::error::{StoreError, StoreResult};
use crate::UserStore;

/// Process-local `RwLock<HashMap>` backend, keyed by token.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(token).cloned())
    }

    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.token) {
            return Err(StoreError::DuplicateToken);
        }

        debug!("Storing new user record for {}", user.email);
        users.insert(user.token.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryUserStore::new();
        assert!(store.find_by_token("tok").await.unwrap().is_none());

        let user = UserRecord::new("a@example.com", "tok");
        store.insert(user.clone()).await.unwrap();

        let found = store.find_by_token("tok").await.unwrap().unwrap();
        assert_eq!(found.email, "a@example.com");
        assert_eq!(found.id, user.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = MemoryUserStore::new();
        store
            .insert(UserRecord::new("a@example.com", "tok"))
            .await
            .unwrap();

        let err = store
            .insert(UserRecord::new("b@example.com", "tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateToken));
        assert_eq!(store.len().await, 1);
    }
}
