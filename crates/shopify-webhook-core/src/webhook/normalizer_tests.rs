//! Tests for [`create_parsed_webhook`] and [`extract_verification_params`].

use super::*;
use crate::{
    headers::{WebhookAttributes, HMAC_SHA256, SHOP_DOMAIN, TOPIC},
    strategy::ExtractionError,
    ErrorKind,
};
use bytes::Bytes;
use serde_json::json;
use std::error::Error;

// ============================================================================
// Test helpers
// ============================================================================

/// In-memory request standing in for a host framework's request type.
#[derive(Clone)]
struct TestRequest {
    body: Bytes,
    headers: Vec<(String, String)>,
}

impl TestRequest {
    fn new(body: &str, headers: &[(&str, &str)]) -> Self {
        Self {
            body: Bytes::copy_from_slice(body.as_bytes()),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn shopify(body: &str) -> Self {
        Self::new(
            body,
            &[
                (SHOP_DOMAIN, "example.myshopify.com"),
                (HMAC_SHA256, "test_hmac"),
                (TOPIC, "orders/create"),
            ],
        )
    }

    fn without(mut self, name: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self
    }

    fn with(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

fn test_strategy(request: &TestRequest) -> Result<ExtractedRequest, ExtractionError> {
    Ok(ExtractedRequest::new(
        request.body.clone(),
        request.headers.iter().cloned().collect(),
    ))
}

fn lowercase_strategy(request: &TestRequest) -> Result<ExtractedRequest, ExtractionError> {
    Ok(ExtractedRequest::new(
        request.body.clone(),
        request
            .headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect(),
    ))
}

fn failing_strategy(_request: &TestRequest) -> Result<ExtractedRequest, ExtractionError> {
    Err(ExtractionError::body(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "client went away",
    )))
}

// ============================================================================
// create_parsed_webhook
// ============================================================================

mod create_parsed_webhook_tests {
    use super::*;

    #[test]
    fn test_builds_record_from_request() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let webhook = create_parsed_webhook(&request, &test_strategy).unwrap();

        assert_eq!(webhook.payload(), &json!({ "test": "data" }));
        assert_eq!(webhook.source_url(), "example.myshopify.com");
        assert_eq!(webhook.onlinestore_name(), "example");
        assert_eq!(webhook.topic(), "orders/create");

        let expected: WebhookAttributes = request.headers.iter().cloned().collect();
        assert_eq!(webhook.attributes(), &expected);
    }

    #[test]
    fn test_lowercase_headers_from_strategy() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let webhook = create_parsed_webhook(&request, &lowercase_strategy).unwrap();

        assert_eq!(webhook.source_url(), "example.myshopify.com");
        assert_eq!(webhook.onlinestore_name(), "example");
        assert_eq!(webhook.topic(), "orders/create");
        assert!(webhook.attributes().as_map().contains_key("x-shopify-topic"));
    }

    #[test]
    fn test_same_input_gives_equal_records() {
        let request = TestRequest::shopify(r#"{"order": {"id": 42, "lines": [1, 2]}}"#);

        let first = create_parsed_webhook(&request, &test_strategy).unwrap();
        let second = create_parsed_webhook(&request, &test_strategy).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_shop_domain_gives_empty_identity() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#).without(SHOP_DOMAIN);

        let webhook = create_parsed_webhook(&request, &test_strategy).unwrap();

        assert_eq!(webhook.source_url(), "");
        assert_eq!(webhook.onlinestore_name(), "");
        assert_eq!(webhook.topic(), "orders/create");
    }

    #[test]
    fn test_non_object_payloads_are_accepted() {
        for body in ["[1, 2, 3]", "\"text\"", "42", "null"] {
            let request = TestRequest::shopify(body);

            let webhook = create_parsed_webhook(&request, &test_strategy).unwrap();

            assert_eq!(
                webhook.payload(),
                &serde_json::from_str::<serde_json::Value>(body).unwrap()
            );
        }
    }

    #[test]
    fn test_invalid_json_is_invalid_payload_format() {
        let request = TestRequest::shopify("not-json");

        let error = create_parsed_webhook(&request, &test_strategy).unwrap_err();

        assert!(matches!(error, NormalizationError::InvalidPayloadFormat(_)));
        assert_eq!(error.kind(), ErrorKind::InvalidPayloadFormat);
    }

    #[test]
    fn test_empty_body_is_invalid_payload_format() {
        let request = TestRequest::shopify("");

        let error = create_parsed_webhook(&request, &test_strategy).unwrap_err();

        assert!(matches!(error, NormalizationError::InvalidPayloadFormat(_)));
    }

    #[test]
    fn test_strategy_failure_is_wrapped_with_cause() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let error = create_parsed_webhook(&request, &failing_strategy).unwrap_err();

        assert!(matches!(
            error,
            NormalizationError::Extraction(ExtractionError::Body { .. })
        ));
        assert_eq!(error.kind(), ErrorKind::ExtractionFailure);

        let cause = error
            .source()
            .and_then(|e| e.source())
            .expect("original error must be kept");
        assert_eq!(cause.to_string(), "client went away");
    }

    #[test]
    fn test_strategy_as_trait_object() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);
        let strategy: &dyn ExtractionStrategy<TestRequest> = &test_strategy;

        let webhook = create_parsed_webhook(&request, strategy).unwrap();

        assert_eq!(webhook.topic(), "orders/create");
    }
}

// ============================================================================
// extract_verification_params
// ============================================================================

mod extract_verification_params_tests {
    use super::*;

    #[test]
    fn test_returns_triple() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let params = extract_verification_params(&request, &test_strategy).unwrap();

        assert_eq!(&params.body()[..], br#"{"test": "data"}"#);
        assert_eq!(params.hmac_signature(), "test_hmac");
        assert_eq!(params.store_name(), "example");
    }

    #[test]
    fn test_lowercase_header_names() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let params = extract_verification_params(&request, &lowercase_strategy).unwrap();

        assert_eq!(params.hmac_signature(), "test_hmac");
        assert_eq!(params.store_name(), "example");
    }

    #[test]
    fn test_store_name_is_lowercased() {
        let request =
            TestRequest::shopify(r#"{"test": "data"}"#).with(SHOP_DOMAIN, "MyStore.myshopify.com");

        let params = extract_verification_params(&request, &test_strategy).unwrap();

        assert_eq!(params.store_name(), "mystore");
    }

    #[test]
    fn test_signature_and_body_pass_through_unchanged() {
        let body = "{ \"spaced\" :  true }\n";
        let request = TestRequest::shopify(body).with(HMAC_SHA256, "3q2+7w==");

        let params = extract_verification_params(&request, &test_strategy).unwrap();

        assert_eq!(&params.body()[..], body.as_bytes());
        assert_eq!(params.hmac_signature(), "3q2+7w==");
    }

    #[test]
    fn test_body_does_not_need_to_be_json() {
        let request = TestRequest::shopify("not-json");

        let params = extract_verification_params(&request, &test_strategy).unwrap();

        assert_eq!(&params.body()[..], b"not-json");
    }

    #[test]
    fn test_missing_hmac_header() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#).without(HMAC_SHA256);

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        match error {
            VerificationError::MissingVerificationHeaders { missing } => {
                assert_eq!(missing, vec![HMAC_SHA256]);
            }
            other => panic!("expected MissingVerificationHeaders, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_hmac_header() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#).with(HMAC_SHA256, "");

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::MissingVerificationHeaders);
    }

    #[test]
    fn test_missing_shop_domain_fails_cleanly() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#).without(SHOP_DOMAIN);

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        match error {
            VerificationError::MissingVerificationHeaders { missing } => {
                assert_eq!(missing, vec![SHOP_DOMAIN]);
            }
            other => panic!("expected MissingVerificationHeaders, got {other:?}"),
        }
    }

    #[test]
    fn test_shop_domain_with_empty_store_segment() {
        let request =
            TestRequest::shopify(r#"{"test": "data"}"#).with(SHOP_DOMAIN, ".myshopify.com");

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::MissingVerificationHeaders);
    }

    #[test]
    fn test_empty_body() {
        let request = TestRequest::shopify("");

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        match error {
            VerificationError::MissingVerificationHeaders { missing } => {
                assert_eq!(missing, vec!["body"]);
            }
            other => panic!("expected MissingVerificationHeaders, got {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_items_are_reported() {
        let request = TestRequest::new("", &[(TOPIC, "orders/create")]);

        let error = extract_verification_params(&request, &test_strategy).unwrap_err();

        match error {
            VerificationError::MissingVerificationHeaders { missing } => {
                assert_eq!(missing, vec![HMAC_SHA256, SHOP_DOMAIN, "body"]);
            }
            other => panic!("expected MissingVerificationHeaders, got {other:?}"),
        }
    }

    #[test]
    fn test_strategy_failure_is_wrapped() {
        let request = TestRequest::shopify(r#"{"test": "data"}"#);

        let error = extract_verification_params(&request, &failing_strategy).unwrap_err();

        assert!(matches!(error, VerificationError::Extraction(_)));
        assert_eq!(error.kind(), ErrorKind::ExtractionFailure);
        assert!(error.source().is_some());
    }

    #[test]
    fn test_store_name_matches_record_derivation() {
        let request =
            TestRequest::shopify(r#"{"test": "data"}"#).with(SHOP_DOMAIN, "Shop-One.eu.myshopify.com");

        let params = extract_verification_params(&request, &test_strategy).unwrap();
        let webhook = create_parsed_webhook(&request, &test_strategy).unwrap();

        assert_eq!(webhook.onlinestore_name(), "Shop-One");
        assert_eq!(params.store_name(), webhook.onlinestore_name().to_lowercase());
    }
}
