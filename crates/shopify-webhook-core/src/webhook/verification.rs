//! Verification triple and the signature verifier seam.
//!
//! This crate stops at producing [`VerificationParameters`]. Recomputing the
//! HMAC with the store's secret is the job of a [`SignatureVerifier`]
//! supplied by the host application.

use async_trait::async_trait;
use bytes::Bytes;

/// Values a signature verifier needs: the raw body, the signature sent by
/// Shopify and the lower-cased store name used to select the secret.
///
/// Only [`extract_verification_params`](super::extract_verification_params)
/// constructs this type, and it never does so with an empty component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationParameters {
    body: Bytes,
    hmac_signature: String,
    store_name: String,
}

impl VerificationParameters {
    pub(crate) fn new(body: Bytes, hmac_signature: String, store_name: String) -> Self {
        Self {
            body,
            hmac_signature,
            store_name,
        }
    }

    /// Request body exactly as received
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Value of the `X-Shopify-Hmac-Sha256` header, unmodified
    pub fn hmac_signature(&self) -> &str {
        &self.hmac_signature
    }

    /// Lower-cased store name, e.g. `example`
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Split into `(body, hmac_signature, store_name)`
    pub fn into_parts(self) -> (Bytes, String, String) {
        (self.body, self.hmac_signature, self.store_name)
    }
}

/// External collaborator that checks a webhook's HMAC signature.
///
/// Implementations look up the secret for
/// [`store_name`](VerificationParameters::store_name), recompute the HMAC
/// over [`body`](VerificationParameters::body) and compare it with
/// [`hmac_signature`](VerificationParameters::hmac_signature) in constant time.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Verify the signature carried by `params`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] if the signature does not match, no secret
    /// is known for the store, or the secret source is unavailable.
    async fn verify(&self, params: &VerificationParameters) -> Result<(), SignatureError>;
}

/// Errors reported by a [`SignatureVerifier`]
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Webhook signature does not match")]
    Invalid,

    #[error("No webhook secret configured for store '{store}'")]
    UnknownStore { store: String },

    #[error("Signature verifier unavailable: {message}")]
    Unavailable { message: String },
}

impl SignatureError {
    /// Check if the failure may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Invalid => false,
            Self::UnknownStore { .. } => false,
            Self::Unavailable { .. } => true,
        }
    }
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
