//! # Extraction Strategies
//!
//! An extraction strategy knows how to pull the raw body and the headers out
//! of one host framework's request type. Everything downstream
//! ([`create_parsed_webhook`], [`extract_verification_params`]) is written
//! against [`ExtractionStrategy`] and never names a concrete request type,
//! so supporting a new host means writing one more strategy.
//!
//! Any function or closure with the signature
//! `Fn(&R) -> Result<ExtractedRequest, ExtractionError>` is a strategy:
//!
//! ```rust
//! use bytes::Bytes;
//! use shopify_webhook_core::strategy::{ExtractedRequest, ExtractionError, ExtractionStrategy};
//! use shopify_webhook_core::headers::WebhookAttributes;
//!
//! struct TestRequest {
//!     body: Vec<u8>,
//! }
//!
//! fn test_strategy(req: &TestRequest) -> Result<ExtractedRequest, ExtractionError> {
//!     Ok(ExtractedRequest::new(
//!         Bytes::copy_from_slice(&req.body),
//!         WebhookAttributes::new(),
//!     ))
//! }
//!
//! let extracted = test_strategy
//!     .extract(&TestRequest { body: b"{}".to_vec() })
//!     .unwrap();
//! assert_eq!(&extracted.body[..], b"{}");
//! ```
//!
//! [`create_parsed_webhook`]: crate::webhook::create_parsed_webhook
//! [`extract_verification_params`]: crate::webhook::extract_verification_params

use crate::headers::WebhookAttributes;
use bytes::Bytes;

/// Boxed error used to carry the host framework's native error as a cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Body and headers pulled out of a host-framework request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRequest {
    /// Request body exactly as received. Signature verification is byte
    /// sensitive, so strategies must not re-encode or trim it.
    pub body: Bytes,

    /// All request headers as received.
    pub headers: WebhookAttributes,
}

impl ExtractedRequest {
    /// Create new extracted request
    pub fn new(body: Bytes, headers: WebhookAttributes) -> Self {
        Self { body, headers }
    }
}

/// Capability to extract body and headers from a request of type `R`.
///
/// Implementations must only read from the request they are given. Both
/// normalization entry points rely on this to be safe to call concurrently.
pub trait ExtractionStrategy<R: ?Sized> {
    /// Extract the raw body and the headers from `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the body or the headers cannot be
    /// read. The host framework's own error must be kept as the source.
    fn extract(&self, request: &R) -> Result<ExtractedRequest, ExtractionError>;
}

impl<R, F> ExtractionStrategy<R> for F
where
    R: ?Sized,
    F: Fn(&R) -> Result<ExtractedRequest, ExtractionError>,
{
    fn extract(&self, request: &R) -> Result<ExtractedRequest, ExtractionError> {
        self(request)
    }
}

/// Errors raised by extraction strategies
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to read request body: {source}")]
    Body {
        #[source]
        source: BoxError,
    },

    #[error("Failed to read request headers: {source}")]
    Headers {
        #[source]
        source: BoxError,
    },

    #[error("Header '{name}' does not contain valid text: {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("Request does not contain the '{binding}' binding")]
    MissingBinding { binding: String },

    #[error("Malformed request: {message}")]
    Malformed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ExtractionError {
    /// Wrap a failure to read the request body
    pub fn body(source: impl Into<BoxError>) -> Self {
        Self::Body {
            source: source.into(),
        }
    }

    /// Wrap a failure to read the request headers
    pub fn headers(source: impl Into<BoxError>) -> Self {
        Self::Headers {
            source: source.into(),
        }
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
