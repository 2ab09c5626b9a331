//! Payment callback signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors that keep a verification from producing a verdict.
///
/// These are distinct from an invalid signature on purpose: a missing field
/// or secret is misconfiguration or a malformed request, not evidence of
/// tampering, and operators need to tell the two apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The shared provider secret is not configured.
    #[error("payment provider secret not configured")]
    MissingSecret,

    /// A required callback field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Verifies payment-provider callbacks.
///
/// The provider signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the
/// shared key secret and reports the hex digest alongside the callback. This
/// is the only integrity control in the payment flow; it must pass before any
/// adoption is marked paid or any e-mail is sent.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    /// Creates a verifier over the shared provider secret.
    ///
    /// An empty secret is tolerated here and rejected at verification time,
    /// so a misconfigured deployment fails closed per request instead of
    /// refusing to boot.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns true iff `signature` is the provider's digest for this
    /// order/payment pair. Comparison is constant-time.
    ///
    /// A signature that does not decode as hex can never match and yields
    /// `false`, not an error.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, SignatureError> {
        if self.secret.is_empty() {
            return Err(SignatureError::MissingSecret);
        }
        if order_id.is_empty() {
            return Err(SignatureError::MissingField("order_id"));
        }
        if payment_id.is_empty() {
            return Err(SignatureError::MissingField("payment_id"));
        }
        if signature.is_empty() {
            return Err(SignatureError::MissingField("signature"));
        }

        let Ok(claimed) = hex::decode(signature) else {
            return Ok(false);
        };

        Ok(self
            .mac(order_id, payment_id)
            .verify_slice(&claimed)
            .is_ok())
    }

    /// Computes the expected hex digest for an order/payment pair.
    ///
    /// This is what the provider sends; exposed so tests and tooling can
    /// build valid callbacks.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
        if self.secret.is_empty() {
            return Err(SignatureError::MissingSecret);
        }
        Ok(hex::encode(
            self.mac(order_id, payment_id).finalize().into_bytes(),
        ))
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac
    }
}
