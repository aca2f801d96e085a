//! Subscription domain module.
//!
//! Handles payment callbacks from the provider and the subscription records
//! they produce.
//!
//! # Module Structure
//!
//! - `payment_callback` - Inbound callback body
//! - `webhook_verifier` - SHA-512 callback signature check
//! - `reservation` - `mallReserved` payload and billing periods
//! - `record` - Subscription record and renewal policy
//! - `pricing` - Amount charged per billing period
//! - `webhook_outcome` - Processing states and outcomes

mod payment_callback;
mod pricing;
mod record;
mod reservation;
mod webhook_errors;
mod webhook_outcome;
mod webhook_verifier;

pub use payment_callback::{PaymentCallback, RESULT_CODE_SUCCESS};
pub use pricing::PriceTable;
pub use record::{RenewalPolicy, SubscriptionRecord};
pub use reservation::{BillingPeriod, Reservation};
pub use webhook_errors::WebhookError;
pub use webhook_outcome::{WebhookOutcome, WebhookState};
pub use webhook_verifier::{callback_signature, CallbackVerifier};
