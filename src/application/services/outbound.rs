use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::application::errors::BotError;
use crate::domain::traits::{Attachment, MessageDelivery};

/// Default delay applied before a regular message is handed to the transport
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(1000);

/// Service for sending messages through the delivery transport
#[derive(Clone)]
pub struct OutboundService {
    delivery: Arc<dyn MessageDelivery>,
    send_delay: Duration,
}

impl OutboundService {
    pub fn new(delivery: Arc<dyn MessageDelivery>) -> Self {
        Self {
            delivery,
            send_delay: DEFAULT_SEND_DELAY,
        }
    }

    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    /// Send a message after the configured delay.
    ///
    /// Must be called inside a tokio runtime. Not safe in mass quantities:
    /// platforms ban accounts that flood their send endpoint.
    pub fn send_message(&self, channel_id: impl Into<String>, content: impl Into<String>) -> JoinHandle<Result<String, BotError>> {
        let delivery = Arc::clone(&self.delivery);
        let delay = self.send_delay;
        let channel_id = channel_id.into();
        let content = content.into();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(channel_id = %channel_id, "Sending message");
            let result = delivery.send_message(&channel_id, &content).await;
            if let Err(ref e) = result {
                tracing::warn!(channel_id = %channel_id, "Failed to send message: {}", e);
            }
            result
        })
    }

    /// Send a bot-authored message immediately
    pub async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<String, BotError> {
        tracing::debug!(channel_id, attachments = attachments.len(), "Sending bot message");
        self.delivery
            .send_bot_message(channel_id, content, attachments)
            .await
    }
}
