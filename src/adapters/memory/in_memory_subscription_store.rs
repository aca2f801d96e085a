//! In-memory subscription store.
//!
//! Used for development without a database and by the HTTP tests. Does not
//! persist data across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::subscription::SubscriptionRecord;
use crate::ports::SubscriptionStore;

/// In-memory implementation of the SubscriptionStore port.
///
/// Thread-safe via an internal `RwLock`.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<HashMap<UserId, SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    /// Returns true if no records exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        "InMemorySubscriptionStore: lock poisoned",
    )
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .map_err(|_| lock_poisoned())?
            .insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn record(user_id: &str, plan: &str) -> SubscriptionRecord {
        let now = Timestamp::now();
        SubscriptionRecord {
            user_id: UserId::new(user_id).unwrap(),
            plan: plan.to_string(),
            started_at: now,
            expires_at: now.checked_add_months(1).unwrap(),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn upsert_then_find() {
        let store = InMemorySubscriptionStore::new();

        store.upsert(&record("u-1", "premium")).await.unwrap();

        let found = store
            .find_by_user_id(&UserId::new("u-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.plan, "premium");
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let store = InMemorySubscriptionStore::new();

        store.upsert(&record("u-1", "basic")).await.unwrap();
        store.upsert(&record("u-1", "premium")).await.unwrap();

        assert_eq!(store.len(), 1);
        let found = store
            .find_by_user_id(&UserId::new("u-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.plan, "premium");
    }

    #[tokio::test]
    async fn find_unknown_user_returns_none() {
        let store = InMemorySubscriptionStore::new();

        let found = store
            .find_by_user_id(&UserId::new("nobody").unwrap())
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(store.is_empty());
    }
}
