//! HandlePaymentWebhookHandler - Command handler for payment provider callbacks.
//!
//! The provider does not retry on any response, so every outcome except a
//! missing signing secret is returned as `Ok` and acknowledged upstream. What
//! actually happened is recorded in the returned [`WebhookOutcome`] and in the
//! log.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::domain::foundation::{DomainError, StateMachine, Timestamp, UserId};
use crate::domain::subscription::{
    CallbackVerifier, PaymentCallback, PriceTable, RenewalPolicy, Reservation,
    SubscriptionRecord, WebhookError, WebhookOutcome, WebhookState,
};
use crate::ports::SubscriptionStore;

/// Command to handle a payment callback.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw callback body.
    pub payload: Vec<u8>,
}

/// Settings injected at construction.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    /// Shared signing secret. `None` disables processing entirely.
    pub secret_key: Option<SecretString>,
    pub renewal_policy: RenewalPolicy,
    /// Prices charged at initiation; callbacks must carry the matching amount.
    pub prices: PriceTable,
    /// Upper bound for each store call made while handling one callback.
    pub store_timeout: Duration,
}

/// Processing progress of one callback, kept for logging.
struct Progress {
    state: WebhookState,
    order_id: Option<String>,
    amount: Option<i64>,
    user_id: Option<UserId>,
    plan: Option<String>,
}

impl Progress {
    fn new() -> Self {
        Self {
            state: WebhookState::Received,
            order_id: None,
            amount: None,
            user_id: None,
            plan: None,
        }
    }

    fn advance(&mut self, next: WebhookState) {
        match self.state.transition_to(next) {
            Ok(state) => self.state = state,
            Err(e) => tracing::warn!(
                from = %self.state,
                to = %next,
                error = %e,
                "Unexpected webhook state transition"
            ),
        }
    }
}

/// Handler for processing payment provider callbacks.
///
/// Verifies the callback signature, decodes the reservation and upserts the
/// user's subscription record.
pub struct HandlePaymentWebhookHandler {
    store: Arc<dyn SubscriptionStore>,
    settings: WebhookSettings,
}

impl HandlePaymentWebhookHandler {
    pub fn new(store: Arc<dyn SubscriptionStore>, settings: WebhookSettings) -> Self {
        Self { store, settings }
    }

    /// Processes one callback.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingSecret` if no signing secret is
    /// configured. All other failures are reported as an `Ok` outcome.
    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let mut progress = Progress::new();

        match self.process(&cmd.payload, &mut progress).await {
            Ok(record) => {
                tracing::info!(
                    order_id = progress.order_id.as_deref().unwrap_or_default(),
                    user_id = %record.user_id,
                    plan = %record.plan,
                    expires_at = %record.expires_at,
                    state = %progress.state,
                    "Subscription applied"
                );
                Ok(WebhookOutcome::Accepted {
                    user_id: record.user_id,
                    plan: record.plan,
                    expires_at: record.expires_at,
                })
            }
            Err(err) if err.is_configuration() => {
                tracing::error!(error = %err, "Payment callback cannot be processed");
                Err(err)
            }
            Err(err) => {
                if let Some(rejection) = WebhookState::rejection_for(&err) {
                    progress.advance(rejection);
                }
                log_rejection(&err, &progress);
                WebhookOutcome::from_error(err.clone(), progress.user_id).ok_or(err)
            }
        }
    }

    async fn process(
        &self,
        payload: &[u8],
        progress: &mut Progress,
    ) -> Result<SubscriptionRecord, WebhookError> {
        let verifier = CallbackVerifier::from_config(self.settings.secret_key.as_ref())?;

        let callback = PaymentCallback::from_json(payload)?;
        progress.order_id = Some(callback.order_id.clone());
        progress.amount = Some(callback.amount);

        verifier.verify(&callback)?;
        progress.advance(WebhookState::SignatureVerified);

        if !callback.is_success() {
            return Err(WebhookError::PaymentDeclined {
                result_code: callback.result_code,
                result_msg: callback.result_msg,
            });
        }
        progress.advance(WebhookState::PaymentSuccessConfirmed);

        let reservation = Reservation::decode(callback.mall_reserved.as_deref())?;
        progress.user_id = Some(reservation.user_id.clone());
        progress.plan = Some(reservation.tier.clone());
        reservation.ensure_matches(&callback, &self.settings.prices)?;
        progress.advance(WebhookState::ReservationDecoded);

        let existing = match self.settings.renewal_policy {
            RenewalPolicy::Overwrite => None,
            RenewalPolicy::Extend => {
                self.bounded(self.store.find_by_user_id(&reservation.user_id))
                    .await?
            }
        };

        let record = SubscriptionRecord::activate(
            &reservation,
            Timestamp::now(),
            existing.as_ref(),
            self.settings.renewal_policy,
        )
        .map_err(|e| WebhookError::Persistence(e.to_string()))?;

        self.bounded(self.store.upsert(&record)).await?;
        progress.advance(WebhookState::SubscriptionApplied);

        Ok(record)
    }

    /// Runs a store call under `store_timeout`.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, WebhookError> {
        match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result.map_err(|e| WebhookError::Persistence(e.to_string())),
            Err(_) => Err(WebhookError::Persistence(format!(
                "subscription store did not respond within {}ms",
                self.settings.store_timeout.as_millis()
            ))),
        }
    }
}

fn log_rejection(err: &WebhookError, progress: &Progress) {
    let order_id = progress.order_id.as_deref().unwrap_or_default();
    let state = progress.state;

    if err.needs_reconciliation() {
        tracing::error!(
            order_id,
            user_id = progress.user_id.as_ref().map(UserId::as_str).unwrap_or_default(),
            plan = progress.plan.as_deref().unwrap_or_default(),
            amount = progress.amount.unwrap_or_default(),
            error = %err,
            state = %state,
            "Paid subscription could not be stored; manual reconciliation required"
        );
        return;
    }

    match err {
        WebhookError::InvalidSignature => {
            tracing::warn!(order_id, state = %state, "Payment callback signature mismatch")
        }
        WebhookError::PaymentDeclined {
            result_code,
            result_msg,
        } => tracing::info!(
            order_id,
            result_code = %result_code,
            result_msg = %result_msg,
            state = %state,
            "Payment declined by provider"
        ),
        other => tracing::warn!(order_id, error = %other, state = %state, "Payment callback rejected"),
    }
}
