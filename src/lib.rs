//! LUKATO Billing - payment webhook and subscription backend
//!
//! Terminates the payment provider's callback, verifies its SHA-512
//! signature and keeps one subscription record per user. Also builds the
//! outbound payment request and answers entitlement queries.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
