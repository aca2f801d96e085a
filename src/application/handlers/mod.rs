//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, InitiatePaymentCommand,
    InitiatePaymentHandler, InitiatorSettings, PaymentRequest, SubscriptionView, WebhookSettings,
};
