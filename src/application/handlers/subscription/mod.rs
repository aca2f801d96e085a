//! Subscription handlers.
//!
//! ## Commands
//! - Processing payment provider callbacks
//! - Initiating a payment
//!
//! ## Queries
//! - Get a user's subscription

mod get_subscription;
mod handle_payment_webhook;
mod initiate_payment;

// Commands
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookSettings,
};
pub use initiate_payment::{
    InitiatePaymentCommand, InitiatePaymentHandler, InitiatorSettings, PaymentRequest,
};

// Queries
pub use get_subscription::{
    GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult, SubscriptionView,
};
