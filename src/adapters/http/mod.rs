//! HTTP adapters - REST API implementations.

pub mod payment;

pub use payment::{app_router, PaymentAppState};
