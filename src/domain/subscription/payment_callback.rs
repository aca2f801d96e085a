//! Inbound payment provider callback.

use serde::{Deserialize, Serialize};

use super::webhook_errors::WebhookError;

/// Result code the provider uses for a successful payment.
pub const RESULT_CODE_SUCCESS: &str = "0000";

/// Asynchronous payment notification sent by the provider.
///
/// Untrusted until [`CallbackVerifier::verify`](super::CallbackVerifier::verify)
/// succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    /// Provider status code; `"0000"` means success.
    pub result_code: String,

    /// Human-readable status.
    #[serde(default)]
    pub result_msg: String,

    /// Merchant identifier assigned by the provider.
    pub mid: String,

    /// Merchant order id echoed from initiation.
    pub order_id: String,

    /// Charged amount in currency minor units.
    pub amount: i64,

    /// Lower-case hex SHA-512 signature.
    pub signature: String,

    /// JSON reservation payload echoed verbatim from initiation.
    #[serde(default)]
    pub mall_reserved: Option<String>,
}

impl PaymentCallback {
    /// Parses a raw JSON request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedCallback` if the body is not JSON or a
    /// required field is missing or mistyped.
    pub fn from_json(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedCallback(e.to_string()))
    }

    /// Returns true if the provider reports the payment as successful.
    pub fn is_success(&self) -> bool {
        self.result_code == RESULT_CODE_SUCCESS
    }
}
