//! InitiatePaymentHandler - Command handler for starting a subscription purchase.
//!
//! Builds the request the client hands to the payment provider's checkout
//! widget. Nothing is persisted; the subscription only exists once the
//! provider's callback is accepted.

use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp, UserId};
use crate::domain::subscription::{BillingPeriod, PriceTable, Reservation};

/// Command to initiate a payment.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    pub user_id: UserId,
    pub tier: String,
    pub months: u32,
}

/// Payment request for the provider checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant_id: String,
    pub order_id: OrderId,
    pub amount: i64,
    pub goods_name: String,
    /// Reservation JSON echoed back on the callback.
    pub mall_reserved: String,
}

/// Settings injected at construction.
#[derive(Debug, Clone)]
pub struct InitiatorSettings {
    pub merchant_id: Option<String>,
    pub prices: PriceTable,
}

/// Handler for initiating payments.
pub struct InitiatePaymentHandler {
    settings: InitiatorSettings,
}

impl InitiatePaymentHandler {
    pub fn new(settings: InitiatorSettings) -> Self {
        Self { settings }
    }

    pub fn handle(&self, cmd: InitiatePaymentCommand) -> Result<PaymentRequest, DomainError> {
        self.handle_at(cmd, Timestamp::now())
    }

    /// Builds the request as of `now`.
    pub fn handle_at(
        &self,
        cmd: InitiatePaymentCommand,
        now: Timestamp,
    ) -> Result<PaymentRequest, DomainError> {
        let merchant_id = self
            .settings
            .merchant_id
            .as_deref()
            .filter(|mid| !mid.trim().is_empty())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ConfigurationMissing,
                    "Payment merchant id is not configured",
                )
            })?;

        let period = BillingPeriod::try_from(cmd.months)?;
        let reservation = Reservation::new(cmd.tier, period, cmd.user_id)?;

        let order_id = OrderId::generate(&reservation.user_id, now);
        let amount = self.settings.prices.amount_for(period);
        let mall_reserved = reservation.encode()?;

        tracing::info!(
            order_id = %order_id,
            user_id = %reservation.user_id,
            tier = %reservation.tier,
            months = period.months(),
            amount,
            "Payment initiated"
        );

        Ok(PaymentRequest {
            merchant_id: merchant_id.to_string(),
            order_id,
            amount,
            goods_name: format!("LUKATO {} ({})", reservation.tier, period),
            mall_reserved,
        })
    }
}
