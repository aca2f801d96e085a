//! GetSubscriptionHandler - Query handler for a user's entitlement.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::SubscriptionStore;

/// Query to get a user's subscription.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

/// Subscription as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    pub user_id: UserId,
    pub plan: String,
    pub started_at: Timestamp,
    pub expires_at: Timestamp,
    /// Evaluated at query time.
    pub is_active: bool,
}

/// Result of successful subscription query.
pub type GetSubscriptionResult = Option<SubscriptionView>;

/// Handler for retrieving a user's subscription.
///
/// Clients poll this after checkout since activation happens asynchronously
/// when the provider callback arrives.
pub struct GetSubscriptionHandler {
    store: Arc<dyn SubscriptionStore>,
}

impl GetSubscriptionHandler {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<GetSubscriptionResult, DomainError> {
        let now = Timestamp::now();
        let record = self.store.find_by_user_id(&query.user_id).await?;

        Ok(record.map(|record| SubscriptionView {
            is_active: record.is_active_at(now),
            user_id: record.user_id,
            plan: record.plan,
            started_at: record.started_at,
            expires_at: record.expires_at,
        }))
    }
}
