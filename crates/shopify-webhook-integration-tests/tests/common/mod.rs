//! Common test utilities for shopify-webhook integration tests
//!
//! This module provides:
//! - Test doubles for the signature verifier and the webhook consumer
//! - Builders for Shopify webhook requests

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use shopify_webhook_api::{create_router, ReceiverState, ServerConfig};
use shopify_webhook_core::{
    headers, ConsumerError, ParsedWebhook, SignatureError, SignatureVerifier,
    VerificationParameters, WebhookConsumer,
};
use std::sync::{Arc, Mutex};

pub const SHOP_DOMAIN: &str = "example.myshopify.com";
pub const SIGNATURE: &str = "test_hmac";
pub const TOPIC: &str = "orders/create";
pub const BODY: &str = r#"{"test": "data"}"#;

// ============================================================================
// Signature verifier
// ============================================================================

/// How the [`MockSignatureVerifier`] answers
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub enum VerifierMode {
    /// Accept when the signature equals [`SIGNATURE`]
    ExpectSignature,
    /// Fail with a transient error
    Unavailable,
}

/// Signature verifier double recording the parameters it was given
#[allow(dead_code)]
pub struct MockSignatureVerifier {
    mode: VerifierMode,
    calls: Mutex<Vec<VerificationParameters>>,
}

#[allow(dead_code)]
impl MockSignatureVerifier {
    pub fn new(mode: VerifierMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<VerificationParameters> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignatureVerifier for MockSignatureVerifier {
    async fn verify(&self, params: &VerificationParameters) -> Result<(), SignatureError> {
        self.calls.lock().unwrap().push(params.clone());

        match self.mode {
            VerifierMode::ExpectSignature if params.hmac_signature() == SIGNATURE => Ok(()),
            VerifierMode::ExpectSignature => Err(SignatureError::Invalid),
            VerifierMode::Unavailable => Err(SignatureError::Unavailable {
                message: "secret store unreachable".to_string(),
            }),
        }
    }
}

// ============================================================================
// Webhook consumer
// ============================================================================

/// Consumer double recording received webhooks
#[derive(Default)]
#[allow(dead_code)]
pub struct MockWebhookConsumer {
    received: Mutex<Vec<ParsedWebhook>>,
    failure: Mutex<Option<fn() -> ConsumerError>>,
}

#[allow(dead_code)]
impl MockWebhookConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, failure: fn() -> ConsumerError) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn received(&self) -> Vec<ParsedWebhook> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookConsumer for MockWebhookConsumer {
    async fn consume(&self, webhook: ParsedWebhook) -> Result<(), ConsumerError> {
        if let Some(failure) = *self.failure.lock().unwrap() {
            return Err(failure());
        }
        self.received.lock().unwrap().push(webhook);
        Ok(())
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Router wired to the given doubles with default server settings
#[allow(dead_code)]
pub fn create_test_router(
    verifier: Arc<MockSignatureVerifier>,
    consumer: Arc<MockWebhookConsumer>,
) -> Router {
    create_test_router_with_config(&ServerConfig::default(), verifier, consumer)
}

#[allow(dead_code)]
pub fn create_test_router_with_config(
    config: &ServerConfig,
    verifier: Arc<MockSignatureVerifier>,
    consumer: Arc<MockWebhookConsumer>,
) -> Router {
    create_router(config, ReceiverState::new(verifier, consumer))
}

/// POST request carrying the standard Shopify headers, minus `omit`
#[allow(dead_code)]
pub fn shopify_request(path: &str, body: impl Into<Body>, omit: &[&str]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");

    for (name, value) in [
        (headers::SHOP_DOMAIN, SHOP_DOMAIN),
        (headers::HMAC_SHA256, SIGNATURE),
        (headers::TOPIC, TOPIC),
    ] {
        if !omit.contains(&name) {
            builder = builder.header(name, value);
        }
    }

    builder.body(body.into()).unwrap()
}

/// Read a response body as JSON
#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
