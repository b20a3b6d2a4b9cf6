use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;

/// MessageDelivery trait - abstraction for the outgoing message transport
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    /// Send a regular message to a channel, returning the delivered message id
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, BotError>;

    /// Send a system/bot-authored message to a channel
    async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<String, BotError>;

    /// Get delivery adapter info
    fn info(&self) -> DeliveryInfo;
}

/// Attachment carried by a bot message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// Delivery adapter information
#[derive(Debug, Clone)]
pub struct DeliveryInfo {
    pub id: String,
    pub name: String,
}
