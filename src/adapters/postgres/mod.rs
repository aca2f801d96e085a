//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresSubscriptionStore` - Subscription upserts keyed by user

mod subscription_store;

pub use subscription_store::PostgresSubscriptionStore;
