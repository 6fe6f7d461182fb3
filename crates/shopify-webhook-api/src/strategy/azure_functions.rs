//! Strategy for Azure Functions custom handlers.
//!
//! With custom handlers the Functions host forwards every trigger invocation
//! to the handler as a JSON envelope:
//!
//! ```json
//! {
//!   "Data": {
//!     "req": {
//!       "Url": "https://app.azurewebsites.net/api/shopify",
//!       "Method": "POST",
//!       "Headers": { "X-Shopify-Topic": ["orders/create"] },
//!       "Body": "{\"id\": 1}"
//!     }
//!   },
//!   "Metadata": {}
//! }
//! ```
//!
//! The HTTP trigger binding is looked up by name (`req` unless the function
//! declares another name in `function.json`). Its `Body` is forwarded as the
//! raw request text, so signatures computed over it still match.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shopify_webhook_core::{
    ExtractedRequest, ExtractionError, ExtractionStrategy, WebhookAttributes,
};
use std::collections::HashMap;
use tracing::{debug, error};

/// Binding name used by the Functions templates for the HTTP trigger
pub const DEFAULT_HTTP_BINDING: &str = "req";

/// Invocation envelope posted by the Functions host to a custom handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    /// Input bindings keyed by binding name
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,

    /// Trigger metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// HTTP trigger input binding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpTriggerBinding {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub method: String,

    /// Header values as sent by the host, one entry per occurrence
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,

    /// Raw request body
    #[serde(default)]
    pub body: Option<String>,
}

/// Extraction strategy reading a named HTTP trigger binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureFunctionsStrategy {
    binding: String,
}

impl AzureFunctionsStrategy {
    /// Create a strategy reading the HTTP trigger bound as `binding`
    pub fn new(binding: impl Into<String>) -> Self {
        Self {
            binding: binding.into(),
        }
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }
}

impl Default for AzureFunctionsStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_BINDING)
    }
}

impl ExtractionStrategy<InvocationRequest> for AzureFunctionsStrategy {
    fn extract(&self, invocation: &InvocationRequest) -> Result<ExtractedRequest, ExtractionError> {
        let value = invocation.data.get(&self.binding).ok_or_else(|| {
            error!(binding = %self.binding, "Invocation has no HTTP trigger binding");
            ExtractionError::MissingBinding {
                binding: self.binding.clone(),
            }
        })?;

        let trigger = HttpTriggerBinding::deserialize(value).map_err(|e| {
            error!(binding = %self.binding, error = %e, "Binding is not an HTTP trigger");
            ExtractionError::Malformed {
                message: format!("binding '{}' is not an HTTP trigger", self.binding),
                source: Some(Box::new(e)),
            }
        })?;

        let headers: WebhookAttributes = trigger
            .headers
            .into_iter()
            .map(|(name, values)| (name, values.join(", ")))
            .collect();
        let body = Bytes::from(trigger.body.unwrap_or_default());

        debug!(
            binding = %self.binding,
            header_count = headers.len(),
            body_size = body.len(),
            "Extracted Azure Functions request body and headers"
        );

        Ok(ExtractedRequest::new(body, headers))
    }
}

/// Extract body and headers from the default `req` binding.
///
/// # Errors
///
/// - [`ExtractionError::MissingBinding`] if the invocation has no `req`
///   binding
/// - [`ExtractionError::Malformed`] if the binding is not an HTTP trigger
pub fn azure_functions_strategy(
    invocation: &InvocationRequest,
) -> Result<ExtractedRequest, ExtractionError> {
    AzureFunctionsStrategy::default().extract(invocation)
}

#[cfg(test)]
#[path = "azure_functions_tests.rs"]
mod tests;
