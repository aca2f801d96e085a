//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for the provider callback and client API
//! - `postgres` - PostgreSQL-backed subscription store
//! - `memory` - In-memory subscription store

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::{app_router, PaymentAppState};
pub use memory::InMemorySubscriptionStore;
pub use postgres::PostgresSubscriptionStore;
