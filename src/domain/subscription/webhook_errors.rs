//! Webhook error types for payment callback handling.
//!
//! Every variant except [`WebhookError::MissingSecret`] is absorbed by the
//! webhook handler and acknowledged to the provider; the variants exist so the
//! failure can be logged and tested precisely.

use thiserror::Error;

/// Errors that occur while processing a payment callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No signing secret is configured, so no callback can be verified.
    #[error("Payment signing secret is not configured")]
    MissingSecret,

    /// Request body is not a well-formed payment callback.
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// Computed signature does not match the provided one.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Provider reported a failed payment.
    #[error("Payment declined with result code {result_code}: {result_msg}")]
    PaymentDeclined {
        result_code: String,
        result_msg: String,
    },

    /// Reservation payload is missing, unparseable or incomplete.
    #[error("Invalid reservation payload: {0}")]
    InvalidReservation(String),

    /// Subscription store read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl WebhookError {
    /// Returns true for errors that must be surfaced instead of acknowledged.
    pub fn is_configuration(&self) -> bool {
        matches!(self, WebhookError::MissingSecret)
    }

    /// Returns true if the error leaves a paying user uncredited.
    ///
    /// These need manual reconciliation since the provider will not retry.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, WebhookError::Persistence(_))
    }
}
