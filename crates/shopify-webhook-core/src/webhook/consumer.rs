//! Business-logic seam receiving normalized webhooks.

use super::ParsedWebhook;
use async_trait::async_trait;

/// Downstream collaborator that acts on a [`ParsedWebhook`], typically by
/// routing on [`topic`](ParsedWebhook::topic).
#[async_trait]
pub trait WebhookConsumer: Send + Sync {
    /// Handle one verified webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError`] if the webhook could not be handled.
    async fn consume(&self, webhook: ParsedWebhook) -> Result<(), ConsumerError>;
}

/// Errors reported by a [`WebhookConsumer`]
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error("Webhook rejected: {message}")]
    Rejected { message: String },

    #[error("Webhook consumer unavailable: {message}")]
    Unavailable { message: String },
}

impl ConsumerError {
    /// Check if the failure may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
