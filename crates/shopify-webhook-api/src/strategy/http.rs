//! Strategy for `http::Request<Bytes>`.

use axum::http::{HeaderMap, Request};
use bytes::Bytes;
use shopify_webhook_core::{ExtractedRequest, ExtractionError, WebhookAttributes};
use tracing::{debug, error};

/// Extract body and headers from a buffered `http::Request`.
///
/// The body is shared, not copied. Header names come out lower-cased, which
/// is how the `http` crate stores them.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidHeaderValue`] if a header value is not
/// visible ASCII text.
///
/// # Examples
///
/// ```rust
/// use axum::http::Request;
/// use bytes::Bytes;
/// use shopify_webhook_api::strategy::http_request_strategy;
/// use shopify_webhook_core::create_parsed_webhook;
///
/// let request = Request::builder()
///     .header("X-Shopify-Shop-Domain", "example.myshopify.com")
///     .header("X-Shopify-Topic", "orders/create")
///     .body(Bytes::from_static(br#"{"test": "data"}"#))
///     .unwrap();
///
/// let webhook = create_parsed_webhook(&request, &http_request_strategy).unwrap();
/// assert_eq!(webhook.onlinestore_name(), "example");
/// ```
pub fn http_request_strategy(request: &Request<Bytes>) -> Result<ExtractedRequest, ExtractionError> {
    let headers = attributes_from_header_map(request.headers())?;

    debug!(
        header_count = headers.len(),
        body_size = request.body().len(),
        "Extracted HTTP request body and headers"
    );

    Ok(ExtractedRequest::new(request.body().clone(), headers))
}

/// Convert an `http` header map into [`WebhookAttributes`].
///
/// Repeated headers are joined with `", "` in the order they were received.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidHeaderValue`] if a value is not visible
/// ASCII text.
pub fn attributes_from_header_map(headers: &HeaderMap) -> Result<WebhookAttributes, ExtractionError> {
    let mut attributes = WebhookAttributes::with_capacity(headers.keys_len());

    for name in headers.keys() {
        let mut values = Vec::new();
        for value in headers.get_all(name) {
            let value = value.to_str().map_err(|e| {
                error!(header = %name, error = %e, "Header value is not valid text");
                ExtractionError::InvalidHeaderValue {
                    name: name.as_str().to_string(),
                    source: Box::new(e),
                }
            })?;
            values.push(value);
        }
        attributes.insert(name.as_str(), values.join(", "));
    }

    Ok(attributes)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
