//! Payment callback signature verification.
//!
//! The provider signs `mid + orderId + amount + resultCode + secretKey` with
//! SHA-512 and sends the digest as lower-case hex. The reservation payload is
//! not covered by the signature.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::payment_callback::PaymentCallback;
use super::webhook_errors::WebhookError;

/// Computes the provider signature for the given callback fields.
///
/// Returns 128 lower-case hex characters (64 byte SHA-512 digest).
pub fn callback_signature(
    mid: &str,
    order_id: &str,
    amount: i64,
    result_code: &str,
    secret_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(mid.as_bytes());
    hasher.update(order_id.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hasher.update(result_code.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifier for payment callback signatures.
#[derive(Clone)]
pub struct CallbackVerifier {
    /// Shared secret agreed with the payment provider.
    secret: SecretString,
}

impl CallbackVerifier {
    /// Creates a verifier from a configured secret.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingSecret` if the secret is absent or blank.
    pub fn from_config(secret: Option<&SecretString>) -> Result<Self, WebhookError> {
        match secret {
            Some(secret) if !secret.expose_secret().trim().is_empty() => Ok(Self {
                secret: secret.clone(),
            }),
            _ => Err(WebhookError::MissingSecret),
        }
    }

    /// Computes the expected signature for a callback.
    pub fn expected_signature(&self, callback: &PaymentCallback) -> String {
        callback_signature(
            &callback.mid,
            &callback.order_id,
            callback.amount,
            &callback.result_code,
            self.secret.expose_secret(),
        )
    }

    /// Verifies the callback signature.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` on any mismatch.
    pub fn verify(&self, callback: &PaymentCallback) -> Result<(), WebhookError> {
        let expected = self.expected_signature(callback);
        if !constant_time_compare(expected.as_bytes(), callback.signature.as_bytes()) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
