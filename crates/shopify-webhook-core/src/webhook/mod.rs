//! # Webhook Module
//!
//! The normalized [`ParsedWebhook`] record, the errors raised while building
//! it, and the two entry points that turn a host-framework request into
//! either a record or a [`VerificationParameters`] triple.

use crate::{
    headers::{self, WebhookAttributes},
    strategy::ExtractionError,
    ErrorKind,
};
use serde::{Deserialize, Serialize};

mod consumer;
mod normalizer;
mod verification;

pub use consumer::{ConsumerError, WebhookConsumer};
pub use normalizer::{create_parsed_webhook, extract_verification_params};
pub use verification::{SignatureError, SignatureVerifier, VerificationParameters};

// ============================================================================
// Store name derivation
// ============================================================================

/// Return the store's short name: everything in `domain` before the first `.`.
///
/// This is the single derivation rule shared by
/// [`ParsedWebhook::onlinestore_name`] and
/// [`VerificationParameters::store_name`]; the verification path lower-cases
/// the result, the record keeps it as-is.
///
/// ```rust
/// use shopify_webhook_core::webhook::store_name_from_domain;
///
/// assert_eq!(store_name_from_domain("example.myshopify.com"), "example");
/// assert_eq!(store_name_from_domain("localhost"), "localhost");
/// assert_eq!(store_name_from_domain(""), "");
/// ```
pub fn store_name_from_domain(domain: &str) -> &str {
    domain.split_once('.').map_or(domain, |(name, _)| name)
}

// ============================================================================
// ParsedWebhook
// ============================================================================

/// Normalized representation of one Shopify webhook delivery.
///
/// Built exactly once per request by [`create_parsed_webhook`] (or directly
/// through [`ParsedWebhook::builder`]) and read-only afterwards. The derived
/// identity fields are resolved at construction:
///
/// - `source_url` falls back to the `X-Shopify-Shop-Domain` header, or `""`
/// - `onlinestore_name` falls back to the part of `source_url` before the
///   first `.`, or `""`
/// - `topic` falls back to the `X-Shopify-Topic` header, or `""`
///
/// Values supplied to the builder win over the header-derived ones; an empty
/// string counts as "not supplied".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParsedWebhookRecord")]
pub struct ParsedWebhook {
    payload: serde_json::Value,
    attributes: WebhookAttributes,
    source_url: String,
    onlinestore_name: String,
    topic: String,
}

impl ParsedWebhook {
    /// Create a record whose identity fields are all derived from `attributes`
    pub fn new(payload: serde_json::Value, attributes: WebhookAttributes) -> Self {
        Self::builder(payload, attributes).build()
    }

    /// Start building a record, optionally overriding derived fields
    pub fn builder(
        payload: serde_json::Value,
        attributes: WebhookAttributes,
    ) -> ParsedWebhookBuilder {
        ParsedWebhookBuilder {
            payload,
            attributes,
            source_url: None,
            onlinestore_name: None,
            topic: None,
        }
    }

    /// Decoded webhook body
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Request headers as supplied by the extraction strategy
    pub fn attributes(&self) -> &WebhookAttributes {
        &self.attributes
    }

    /// Shop domain the webhook originated from, e.g. `example.myshopify.com`
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Short store name, e.g. `example`
    pub fn onlinestore_name(&self) -> &str {
        &self.onlinestore_name
    }

    /// Event topic, e.g. `orders/create`
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Look up any request header, tolerating casing differences
    pub fn header(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Consume the record and return the decoded payload
    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }
}

/// Explicit construction step for [`ParsedWebhook`].
///
/// Derived fields are filled in by [`build`](Self::build) only where the
/// caller left a gap.
#[derive(Debug, Clone)]
pub struct ParsedWebhookBuilder {
    payload: serde_json::Value,
    attributes: WebhookAttributes,
    source_url: Option<String>,
    onlinestore_name: Option<String>,
    topic: Option<String>,
}

impl ParsedWebhookBuilder {
    pub fn source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    pub fn onlinestore_name(mut self, onlinestore_name: impl Into<String>) -> Self {
        self.onlinestore_name = Some(onlinestore_name.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Resolve the derived fields and produce the immutable record.
    ///
    /// `onlinestore_name` is derived from the resolved `source_url`, so a
    /// caller-supplied `source_url` also drives the store name.
    pub fn build(self) -> ParsedWebhook {
        let source_url = supplied(self.source_url).unwrap_or_else(|| {
            self.attributes
                .get(headers::SHOP_DOMAIN)
                .unwrap_or_default()
                .to_string()
        });

        let onlinestore_name = supplied(self.onlinestore_name)
            .unwrap_or_else(|| store_name_from_domain(&source_url).to_string());

        let topic = supplied(self.topic).unwrap_or_else(|| {
            self.attributes
                .get(headers::TOPIC)
                .unwrap_or_default()
                .to_string()
        });

        ParsedWebhook {
            payload: self.payload,
            attributes: self.attributes,
            source_url,
            onlinestore_name,
            topic,
        }
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Wire shape accepted when deserializing a [`ParsedWebhook`]; routed through
/// the builder so deserialized records obey the same derivation rules.
#[derive(Deserialize)]
struct ParsedWebhookRecord {
    payload: serde_json::Value,
    #[serde(default)]
    attributes: WebhookAttributes,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    onlinestore_name: Option<String>,
    #[serde(default)]
    topic: Option<String>,
}

impl From<ParsedWebhookRecord> for ParsedWebhook {
    fn from(record: ParsedWebhookRecord) -> Self {
        let mut builder = ParsedWebhook::builder(record.payload, record.attributes);
        if let Some(source_url) = record.source_url {
            builder = builder.source_url(source_url);
        }
        if let Some(onlinestore_name) = record.onlinestore_name {
            builder = builder.onlinestore_name(onlinestore_name);
        }
        if let Some(topic) = record.topic {
            builder = builder.topic(topic);
        }
        builder.build()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure to turn a request into a [`ParsedWebhook`]
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    /// The strategy could not read the request
    #[error("Failed to extract webhook request: {0}")]
    Extraction(#[source] ExtractionError),

    /// The body is not valid JSON
    #[error("Invalid payload format: {0}")]
    InvalidPayloadFormat(#[source] serde_json::Error),
}

impl NormalizationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) => ErrorKind::ExtractionFailure,
            Self::InvalidPayloadFormat(_) => ErrorKind::InvalidPayloadFormat,
        }
    }
}

/// Failure to produce [`VerificationParameters`]
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The strategy could not read the request
    #[error("Failed to extract webhook request: {0}")]
    Extraction(#[source] ExtractionError),

    /// One or more of the signature header, shop domain header or body is
    /// absent or empty
    #[error("Missing required verification headers: {}", .missing.join(", "))]
    MissingVerificationHeaders { missing: Vec<&'static str> },
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) => ErrorKind::ExtractionFailure,
            Self::MissingVerificationHeaders { .. } => ErrorKind::MissingVerificationHeaders,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
