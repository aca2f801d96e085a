//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `subscription` - Payment callbacks and subscription lifecycle

pub mod foundation;
pub mod subscription;
