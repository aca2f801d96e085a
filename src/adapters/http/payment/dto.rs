//! Data Transfer Objects for payment HTTP endpoints.
//!
//! Provider-facing bodies use the provider's camelCase names; client-facing
//! bodies follow the rest of the API.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::{PaymentRequest, SubscriptionView};

// ════════════════════════════════════════════════════════════════════════════════
// Webhook DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Value of `receiveResult` that stops provider retries.
pub const RECEIVE_RESULT_SUCCESS: &str = "SUCCESS";

/// Acknowledgment returned to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub receive_result: String,
}

impl AckResponse {
    pub fn success() -> Self {
        Self {
            receive_result: RECEIVE_RESULT_SUCCESS.to_string(),
        }
    }
}

/// Generic failure body, only used when the webhook cannot run at all.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookFailureResponse {
    pub error: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a subscription purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentRequest {
    /// Subscription plan, e.g. "premium".
    pub tier: String,
    /// Billing period in months (1, 6 or 12).
    pub months: u32,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Payment request handed to the provider checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentResponse {
    pub merchant_id: String,
    pub order_id: String,
    pub amount: i64,
    pub goods_name: String,
    pub mall_reserved: String,
}

impl From<PaymentRequest> for InitiatePaymentResponse {
    fn from(request: PaymentRequest) -> Self {
        Self {
            merchant_id: request.merchant_id,
            order_id: request.order_id.to_string(),
            amount: request.amount,
            goods_name: request.goods_name,
            mall_reserved: request.mall_reserved,
        }
    }
}

/// Current user's subscription.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub user_id: String,
    pub plan: String,
    /// ISO 8601 timestamp.
    pub started_at: String,
    /// ISO 8601 timestamp.
    pub expires_at: String,
    pub is_active: bool,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            user_id: view.user_id.to_string(),
            plan: view.plan,
            started_at: view.started_at.to_rfc3339(),
            expires_at: view.expires_at.to_rfc3339(),
            is_active: view.is_active,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
