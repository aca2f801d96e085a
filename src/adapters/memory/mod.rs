//! In-memory adapters for development and tests.

mod in_memory_subscription_store;

pub use in_memory_subscription_store::InMemorySubscriptionStore;
