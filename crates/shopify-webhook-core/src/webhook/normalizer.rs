//! Request normalization and verification-parameter extraction.

use super::{
    store_name_from_domain, NormalizationError, ParsedWebhook, VerificationError,
    VerificationParameters,
};
use crate::{
    headers,
    strategy::{ExtractedRequest, ExtractionStrategy},
};
use tracing::{debug, error, info};

/// Name reported in [`VerificationError::MissingVerificationHeaders`] when
/// the body is empty.
const BODY: &str = "body";

/// Turn a host-framework request into a [`ParsedWebhook`].
///
/// Runs `strategy` against `request`, decodes the body as JSON and builds the
/// record, deriving `source_url`, `onlinestore_name` and `topic` from the
/// headers.
///
/// # Errors
///
/// - [`NormalizationError::Extraction`] if the strategy fails; the
///   strategy's error is kept as the source
/// - [`NormalizationError::InvalidPayloadFormat`] if the body is not valid
///   JSON
///
/// # Examples
///
/// ```rust
/// use bytes::Bytes;
/// use shopify_webhook_core::strategy::{ExtractedRequest, ExtractionError};
/// use shopify_webhook_core::webhook::create_parsed_webhook;
///
/// let request = (
///     r#"{"id": 1}"#,
///     vec![("X-Shopify-Shop-Domain", "example.myshopify.com")],
/// );
/// let strategy = |req: &(&'static str, Vec<(&'static str, &'static str)>)|
///     -> Result<ExtractedRequest, ExtractionError> {
///     Ok(ExtractedRequest::new(
///         Bytes::from_static(req.0.as_bytes()),
///         req.1.iter().copied().collect(),
///     ))
/// };
///
/// let webhook = create_parsed_webhook(&request, &strategy).unwrap();
/// assert_eq!(webhook.onlinestore_name(), "example");
/// ```
pub fn create_parsed_webhook<R, S>(
    request: &R,
    strategy: &S,
) -> Result<ParsedWebhook, NormalizationError>
where
    R: ?Sized,
    S: ExtractionStrategy<R> + ?Sized,
{
    let ExtractedRequest {
        body,
        headers: attributes,
    } = strategy.extract(request).map_err(|e| {
        error!(error = %e, "Failed to extract webhook request using strategy");
        NormalizationError::Extraction(e)
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        error!(
            error = %e,
            line = e.line(),
            column = e.column(),
            body_size = body.len(),
            "Failed to parse webhook body as JSON"
        );
        NormalizationError::InvalidPayloadFormat(e)
    })?;

    let webhook = ParsedWebhook::new(payload, attributes);

    debug!(
        shop_domain = %webhook.source_url(),
        topic = %webhook.topic(),
        "Parsed webhook request"
    );

    Ok(webhook)
}

/// Extract the values needed to verify a webhook's HMAC signature.
///
/// Returns the untouched body, the `X-Shopify-Hmac-Sha256` value and the
/// lower-cased store name taken from `X-Shopify-Shop-Domain`. The shop
/// domain is only split once it is known to be present and non-empty.
///
/// # Errors
///
/// - [`VerificationError::Extraction`] if the strategy fails
/// - [`VerificationError::MissingVerificationHeaders`] if the signature
///   header, the shop domain header or the body is absent or empty. Every
///   missing item is listed.
pub fn extract_verification_params<R, S>(
    request: &R,
    strategy: &S,
) -> Result<VerificationParameters, VerificationError>
where
    R: ?Sized,
    S: ExtractionStrategy<R> + ?Sized,
{
    let ExtractedRequest {
        body,
        headers: attributes,
    } = strategy.extract(request).map_err(|e| {
        error!(error = %e, "Failed to extract webhook request using strategy");
        VerificationError::Extraction(e)
    })?;

    let hmac_signature = attributes
        .get(headers::HMAC_SHA256)
        .filter(|value| !value.is_empty());

    let store_name = attributes
        .get(headers::SHOP_DOMAIN)
        .map(store_name_from_domain)
        .filter(|name| !name.is_empty());

    let mut missing = Vec::new();
    if hmac_signature.is_none() {
        missing.push(headers::HMAC_SHA256);
    }
    if store_name.is_none() {
        missing.push(headers::SHOP_DOMAIN);
    }
    if body.is_empty() {
        missing.push(BODY);
    }

    match (hmac_signature, store_name) {
        (Some(hmac_signature), Some(store_name)) if missing.is_empty() => {
            let params = VerificationParameters::new(
                body,
                hmac_signature.to_string(),
                store_name.to_lowercase(),
            );

            info!(
                store_name = %params.store_name(),
                body_size = params.body().len(),
                "Extracted verification parameters"
            );

            Ok(params)
        }
        _ => {
            error!(missing = ?missing, "Missing required Shopify verification headers");
            Err(VerificationError::MissingVerificationHeaders { missing })
        }
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
