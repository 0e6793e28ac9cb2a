//! User record resolved by the access gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as stored in the token-keyed user store.
///
/// Unique on `token`; created the first time an identity token
/// verifies successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a new record for a freshly verified token.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            token: token.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = UserRecord::new("a@example.com", "tok-a");
        let b = UserRecord::new("b@example.com", "tok-b");
        assert_ne!(a.id, b.id);
    }
}
