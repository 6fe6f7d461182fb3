//! Error types for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shopify_webhook_core::{ErrorKind, WebhookError};
use tracing::{error, warn};

/// Seconds a sender is asked to wait before retrying a transient failure
const RETRY_AFTER_SECONDS: u64 = 60;

/// Webhook handler errors with HTTP status code mapping
///
/// | Failure | Status |
/// |---------|--------|
/// | Malformed JSON body | `400 Bad Request` |
/// | Missing signature, shop domain or body | `401 Unauthorized` |
/// | Signature rejected | `401 Unauthorized` |
/// | Request could not be read | `502 Bad Gateway` |
/// | Transient verifier/consumer failure | `503 Service Unavailable` + `Retry-After` |
/// | Permanent consumer failure | `500 Internal Server Error` |
///
/// Messages for server-side failures are replaced with a generic text; the
/// detail is logged.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl WebhookHandlerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        let Self::Webhook(e) = self;
        if e.is_transient() {
            return StatusCode::SERVICE_UNAVAILABLE;
        }
        match e.kind() {
            ErrorKind::InvalidPayloadFormat => StatusCode::BAD_REQUEST,
            ErrorKind::MissingVerificationHeaders => StatusCode::UNAUTHORIZED,
            ErrorKind::SignatureRejected => StatusCode::UNAUTHORIZED,
            ErrorKind::ExtractionFailure => StatusCode::BAD_GATEWAY,
            ErrorKind::ConsumerFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let Self::Webhook(ref e) = self;

        let (message, retry_after) = if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(error = %e, kind = %e.kind(), "Transient webhook failure");
            (
                "Webhook could not be processed right now. Please retry later.".to_string(),
                Some(RETRY_AFTER_SECONDS),
            )
        } else if status.is_server_error() {
            error!(error = %e, kind = %e.kind(), "Webhook processing failed");
            (
                "Internal server error occurred. Please try again later.".to_string(),
                None,
            )
        } else {
            warn!(error = %e, kind = %e.kind(), "Rejected webhook request");
            (e.to_string(), None)
        };

        let body = serde_json::json!({
            "error": message,
            "kind": e.kind().as_str(),
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let mut response = (status, Json(body)).into_response();

        if let Some(retry_seconds) = retry_after {
            if let Ok(header_value) = retry_seconds.to_string().parse() {
                response.headers_mut().insert("Retry-After", header_value);
            }
        }

        response
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Logging initialisation failed: {message}")]
    Logging { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
