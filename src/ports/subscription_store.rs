//! Subscription store port.
//!
//! Defines the contract for persisting subscription records. Each user has at
//! most one record, so writes are upserts keyed by `user_id`.
//!
//! # Example
//!
//! ```ignore
//! async fn credit(
//!     store: &dyn SubscriptionStore,
//!     reservation: &Reservation,
//! ) -> Result<SubscriptionRecord, DomainError> {
//!     let record = SubscriptionRecord::activate(
//!         reservation,
//!         Timestamp::now(),
//!         None,
//!         RenewalPolicy::Overwrite,
//!     )?;
//!     store.upsert(&record).await?;
//!     Ok(record)
//! }
//! ```

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::SubscriptionRecord;
use async_trait::async_trait;

/// Persistence port for subscription records.
///
/// Implementations must:
/// - Replace `plan`, `started_at`, `expires_at` and `updated_at` when a
///   record for the user already exists
/// - Make the upsert a single atomic write
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert or replace the record for `record.user_id`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError>;

    /// Find the record for a user.
    ///
    /// Returns `None` if the user never purchased a subscription.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError>;
}
