//! Reservation payload carried through the payment provider.
//!
//! The initiator encodes `{tier, months, userId}` into the provider's
//! `mallReserved` field; the provider echoes it back verbatim on the callback.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, UserId, ValidationError};

use super::payment_callback::PaymentCallback;
use super::pricing::PriceTable;
use super::webhook_errors::WebhookError;

/// Purchasable subscription length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BillingPeriod {
    OneMonth,
    SixMonths,
    TwelveMonths,
}

impl BillingPeriod {
    /// All purchasable periods, shortest first.
    pub const ALL: [BillingPeriod; 3] = [
        BillingPeriod::OneMonth,
        BillingPeriod::SixMonths,
        BillingPeriod::TwelveMonths,
    ];

    /// Number of calendar months in the period.
    pub fn months(&self) -> u32 {
        match self {
            BillingPeriod::OneMonth => 1,
            BillingPeriod::SixMonths => 6,
            BillingPeriod::TwelveMonths => 12,
        }
    }
}

impl TryFrom<u32> for BillingPeriod {
    type Error = ValidationError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        match months {
            1 => Ok(BillingPeriod::OneMonth),
            6 => Ok(BillingPeriod::SixMonths),
            12 => Ok(BillingPeriod::TwelveMonths),
            other => Err(ValidationError::not_allowed("months", "1, 6, 12", other)),
        }
    }
}

impl From<BillingPeriod> for u32 {
    fn from(period: BillingPeriod) -> Self {
        period.months()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingPeriod::OneMonth => write!(f, "1 month"),
            other => write!(f, "{} months", other.months()),
        }
    }
}

/// Decoded reservation: which user bought which plan for how long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub tier: String,
    pub months: BillingPeriod,
    pub user_id: UserId,
}

/// Wire shape before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationPayload {
    tier: String,
    months: u32,
    user_id: String,
}

impl Reservation {
    /// Creates a validated reservation.
    pub fn new(
        tier: impl Into<String>,
        months: BillingPeriod,
        user_id: UserId,
    ) -> Result<Self, ValidationError> {
        let tier = tier.into();
        if tier.trim().is_empty() {
            return Err(ValidationError::empty_field("tier"));
        }
        Ok(Self {
            tier,
            months,
            user_id,
        })
    }

    /// Decodes the `mallReserved` string of a callback.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidReservation` if the payload is absent,
    /// not JSON, lacks `tier`/`months`/`userId`, or holds invalid values.
    pub fn decode(mall_reserved: Option<&str>) -> Result<Self, WebhookError> {
        let raw = mall_reserved
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| WebhookError::InvalidReservation("mallReserved is missing".to_string()))?;

        let payload: ReservationPayload = serde_json::from_str(raw)
            .map_err(|e| WebhookError::InvalidReservation(e.to_string()))?;

        let invalid = |e: ValidationError| WebhookError::InvalidReservation(e.to_string());
        let months = BillingPeriod::try_from(payload.months).map_err(invalid)?;
        let user_id = UserId::new(payload.user_id).map_err(invalid)?;
        Self::new(payload.tier, months, user_id).map_err(invalid)
    }

    /// Checks the reservation against the signed fields of its callback.
    ///
    /// `mallReserved` is outside the signature, so it is only trusted when the
    /// signed order id was issued to the reserved user and the signed amount
    /// is the price of the reserved period.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidReservation` on either mismatch.
    pub fn ensure_matches(
        &self,
        callback: &PaymentCallback,
        prices: &PriceTable,
    ) -> Result<(), WebhookError> {
        if !OrderId::is_issued_to(&callback.order_id, &self.user_id) {
            return Err(WebhookError::InvalidReservation(format!(
                "order {} was not issued to user {}",
                callback.order_id, self.user_id
            )));
        }

        let expected = prices.amount_for(self.months);
        if callback.amount != expected {
            return Err(WebhookError::InvalidReservation(format!(
                "amount {} does not match price {} for {}",
                callback.amount, expected, self.months
            )));
        }

        Ok(())
    }

    /// Encodes as the JSON string placed in `mallReserved`.
    pub fn encode(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode reservation: {}", e),
            )
        })
    }
}
