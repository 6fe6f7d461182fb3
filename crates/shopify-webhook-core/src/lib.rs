//! # Shopify Webhook Core
//!
//! Normalization of inbound Shopify webhook requests, independent of the HTTP
//! framework that received them.
//!
//! A host framework hands its request to one of two entry points together
//! with an [`ExtractionStrategy`] that knows how to read that framework's
//! request type:
//!
//! - [`create_parsed_webhook`] decodes the JSON body and builds a
//!   [`ParsedWebhook`] carrying the payload, the headers and the store/topic
//!   identity derived from them
//! - [`extract_verification_params`] returns the exact
//!   [`VerificationParameters`] a [`SignatureVerifier`] needs to check the
//!   HMAC signature
//!
//! Both are synchronous, stateless and safe to call concurrently.
//!
//! ## Usage
//!
//! ```rust
//! use bytes::Bytes;
//! use shopify_webhook_core::{
//!     create_parsed_webhook, extract_verification_params, ExtractedRequest, ExtractionError,
//!     WebhookAttributes,
//! };
//!
//! struct IncomingRequest {
//!     body: Bytes,
//!     headers: WebhookAttributes,
//! }
//!
//! fn strategy(req: &IncomingRequest) -> Result<ExtractedRequest, ExtractionError> {
//!     Ok(ExtractedRequest::new(req.body.clone(), req.headers.clone()))
//! }
//!
//! let request = IncomingRequest {
//!     body: Bytes::from_static(br#"{"test": "data"}"#),
//!     headers: [
//!         ("X-Shopify-Shop-Domain", "example.myshopify.com"),
//!         ("X-Shopify-Hmac-Sha256", "test_hmac"),
//!         ("X-Shopify-Topic", "orders/create"),
//!     ]
//!     .into_iter()
//!     .collect(),
//! };
//!
//! let params = extract_verification_params(&request, &strategy).unwrap();
//! assert_eq!(params.store_name(), "example");
//!
//! let webhook = create_parsed_webhook(&request, &strategy).unwrap();
//! assert_eq!(webhook.topic(), "orders/create");
//! ```

use std::fmt;

pub mod headers;
pub mod strategy;
pub mod webhook;

pub use headers::WebhookAttributes;
pub use strategy::{ExtractedRequest, ExtractionError, ExtractionStrategy};
pub use webhook::{
    create_parsed_webhook, extract_verification_params, ConsumerError, NormalizationError,
    ParsedWebhook, ParsedWebhookBuilder, SignatureError, SignatureVerifier, VerificationError,
    VerificationParameters, WebhookConsumer,
};

/// Standard result type for webhook intake operations
pub type WebhookResult<T> = Result<T, WebhookError>;

// ============================================================================
// Error Classification
// ============================================================================

/// Closed set of failure kinds, stable enough for callers to map onto
/// transport-level responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The host framework's request could not be read
    ExtractionFailure,
    /// The body is not valid JSON
    InvalidPayloadFormat,
    /// Signature header, shop domain header or body is missing
    MissingVerificationHeaders,
    /// The signature verifier did not accept the request
    SignatureRejected,
    /// The downstream consumer failed
    ConsumerFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractionFailure => "extraction_failure",
            Self::InvalidPayloadFormat => "invalid_payload_format",
            Self::MissingVerificationHeaders => "missing_verification_headers",
            Self::SignatureRejected => "signature_rejected",
            Self::ConsumerFailure => "consumer_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error for webhook intake
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Webhook normalization failed: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Verification parameter extraction failed: {0}")]
    Verification(#[from] VerificationError),

    #[error("Signature verification failed: {0}")]
    Signature(#[from] SignatureError),

    #[error("Webhook consumer failed: {0}")]
    Consumer(#[from] ConsumerError),
}

impl WebhookError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Normalization(e) => e.kind(),
            Self::Verification(e) => e.kind(),
            Self::Signature(_) => ErrorKind::SignatureRejected,
            Self::Consumer(_) => ErrorKind::ConsumerFailure,
        }
    }

    /// Check if error is transient and the sender should retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Normalization(_) => false,
            Self::Verification(_) => false,
            Self::Signature(e) => e.is_transient(),
            Self::Consumer(e) => e.is_transient(),
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
