//! Webhook processing state machine and outcomes.
//!
//! Every outcome is acknowledged identically to the provider. The variants
//! keep what actually happened inspectable for logging and tests.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::{StateMachine, Timestamp, UserId};

use super::webhook_errors::WebhookError;

/// Processing state of a single payment callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookState {
    Received,
    SignatureVerified,
    PaymentSuccessConfirmed,
    ReservationDecoded,
    SubscriptionApplied,
    RejectedMalformedCallback,
    RejectedBadSignature,
    RejectedPaymentFailed,
    RejectedBadReservation,
    PersistenceFailed,
}

impl WebhookState {
    /// Returns the stable log label for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookState::Received => "RECEIVED",
            WebhookState::SignatureVerified => "SIGNATURE_VERIFIED",
            WebhookState::PaymentSuccessConfirmed => "PAYMENT_SUCCESS_CONFIRMED",
            WebhookState::ReservationDecoded => "RESERVATION_DECODED",
            WebhookState::SubscriptionApplied => "SUBSCRIPTION_APPLIED",
            WebhookState::RejectedMalformedCallback => "REJECTED_MALFORMED_CALLBACK",
            WebhookState::RejectedBadSignature => "REJECTED_BAD_SIGNATURE",
            WebhookState::RejectedPaymentFailed => "REJECTED_PAYMENT_FAILED",
            WebhookState::RejectedBadReservation => "REJECTED_BAD_RESERVATION",
            WebhookState::PersistenceFailed => "PERSISTENCE_FAILED",
        }
    }

    /// Terminal state reached when `err` interrupts processing.
    pub fn rejection_for(err: &WebhookError) -> Option<Self> {
        match err {
            WebhookError::MissingSecret => None,
            WebhookError::MalformedCallback(_) => Some(WebhookState::RejectedMalformedCallback),
            WebhookError::InvalidSignature => Some(WebhookState::RejectedBadSignature),
            WebhookError::PaymentDeclined { .. } => Some(WebhookState::RejectedPaymentFailed),
            WebhookError::InvalidReservation(_) => Some(WebhookState::RejectedBadReservation),
            WebhookError::Persistence(_) => Some(WebhookState::PersistenceFailed),
        }
    }
}

impl StateMachine for WebhookState {
    fn valid_transitions(&self) -> Vec<Self> {
        use WebhookState::*;
        match self {
            Received => vec![
                SignatureVerified,
                RejectedMalformedCallback,
                RejectedBadSignature,
            ],
            SignatureVerified => vec![PaymentSuccessConfirmed, RejectedPaymentFailed],
            PaymentSuccessConfirmed => vec![ReservationDecoded, RejectedBadReservation],
            ReservationDecoded => vec![SubscriptionApplied, PersistenceFailed],
            SubscriptionApplied
            | RejectedMalformedCallback
            | RejectedBadSignature
            | RejectedPaymentFailed
            | RejectedBadReservation
            | PersistenceFailed => vec![],
        }
    }
}

impl fmt::Display for WebhookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Subscription was written.
    Accepted {
        user_id: UserId,
        plan: String,
        expires_at: Timestamp,
    },

    /// Signature mismatch; nothing was changed.
    RejectedAuth,

    /// Provider reported a failed payment; nothing was changed.
    RejectedBusiness {
        result_code: String,
        result_msg: String,
    },

    /// Callback body or reservation payload was unusable; nothing was changed.
    RejectedData { reason: String },

    /// Payment succeeded but the subscription write failed.
    PersistenceFailed { user_id: UserId, reason: String },
}

impl WebhookOutcome {
    /// Builds the outcome for a processing error.
    ///
    /// Returns `None` for configuration errors, which are not outcomes.
    pub fn from_error(err: WebhookError, user_id: Option<UserId>) -> Option<Self> {
        let outcome = match err {
            WebhookError::MissingSecret => return None,
            WebhookError::InvalidSignature => WebhookOutcome::RejectedAuth,
            WebhookError::PaymentDeclined {
                result_code,
                result_msg,
            } => WebhookOutcome::RejectedBusiness {
                result_code,
                result_msg,
            },
            WebhookError::MalformedCallback(reason) | WebhookError::InvalidReservation(reason) => {
                WebhookOutcome::RejectedData { reason }
            }
            WebhookError::Persistence(reason) => match user_id {
                Some(user_id) => WebhookOutcome::PersistenceFailed { user_id, reason },
                None => WebhookOutcome::RejectedData { reason },
            },
        };
        Some(outcome)
    }

    /// Returns true if the subscription was written.
    pub fn is_accepted(&self) -> bool {
        matches!(self, WebhookOutcome::Accepted { .. })
    }
}
