//! # Shopify Webhook API
//!
//! Host-framework adapters for `shopify-webhook-core`:
//!
//! - [`strategy`]: extraction strategies for `http::Request<Bytes>` and
//!   Azure Functions custom-handler invocations
//! - [`create_router`]: a mountable axum route that verifies, normalizes and
//!   hands webhooks to a [`WebhookConsumer`]
//! - [`WebhookHandlerError`]: mapping of intake failures to HTTP responses
//! - [`ReceiverConfig`] and [`logging::init_tracing`] for host binaries
//!
//! The route never computes HMACs itself; it calls the injected
//! [`SignatureVerifier`].

pub mod config;
pub mod errors;
pub mod logging;
pub mod strategy;

pub use config::{LoggingConfig, ReceiverConfig, ServerConfig};
pub use errors::{ConfigError, WebhookHandlerError};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Request},
    response::Json,
    routing::post,
    Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shopify_webhook_core::{
    create_parsed_webhook, extract_verification_params, SignatureVerifier, WebhookConsumer,
    WebhookError,
};
use std::sync::Arc;
use strategy::http_request_strategy;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Collaborators shared by all webhook requests
#[derive(Clone)]
pub struct ReceiverState {
    /// Checks the HMAC signature of each request
    pub signature_verifier: Arc<dyn SignatureVerifier>,

    /// Receives each verified webhook
    pub consumer: Arc<dyn WebhookConsumer>,
}

impl ReceiverState {
    pub fn new(
        signature_verifier: Arc<dyn SignatureVerifier>,
        consumer: Arc<dyn WebhookConsumer>,
    ) -> Self {
        Self {
            signature_verifier,
            consumer,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the webhook route.
///
/// Mounts `POST {config.endpoint_path}` with a body size limit of
/// `config.max_body_size` bytes and HTTP request tracing.
pub fn create_router(config: &ServerConfig, state: ReceiverState) -> Router {
    Router::new()
        .route(&config.endpoint_path, post(handle_webhook))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response returned once a webhook has been handed to the consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookAccepted {
    pub status: String,
    pub topic: String,
    pub shop: String,
}

/// Handle a Shopify webhook delivery
#[instrument(skip(state, headers, body), fields(body_size = body.len()))]
pub async fn handle_webhook(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAccepted>, WebhookHandlerError> {
    let mut request = Request::new(body);
    *request.headers_mut() = headers;

    let accepted = process_webhook(&state, &request).await?;
    Ok(Json(accepted))
}

/// Run one buffered request through verification, normalization and the
/// consumer.
///
/// Verification comes first: the consumer never sees a webhook whose
/// signature was not accepted.
///
/// # Errors
///
/// Returns the [`WebhookError`] of the first step that fails.
pub async fn process_webhook(
    state: &ReceiverState,
    request: &Request<Bytes>,
) -> Result<WebhookAccepted, WebhookError> {
    let params = extract_verification_params(request, &http_request_strategy)?;

    if let Err(e) = state.signature_verifier.verify(&params).await {
        warn!(
            store_name = %params.store_name(),
            error = %e,
            "Webhook signature verification failed"
        );
        return Err(e.into());
    }

    let webhook = create_parsed_webhook(request, &http_request_strategy)?;

    let accepted = WebhookAccepted {
        status: "accepted".to_string(),
        topic: webhook.topic().to_string(),
        shop: webhook.onlinestore_name().to_string(),
    };

    info!(
        shop = %accepted.shop,
        topic = %accepted.topic,
        "Accepted webhook"
    );

    state.consumer.consume(webhook).await?;

    Ok(accepted)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
