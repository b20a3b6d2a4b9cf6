//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::traits::{Attachment, DeliveryInfo, MessageDelivery};
use crate::application::errors::BotError;

/// Console delivery adapter for local development
pub struct ConsoleAdapter {
    info: DeliveryInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: DeliveryInfo {
                id: "console".to_string(),
                name: "aqua".to_string(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageDelivery for ConsoleAdapter {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, BotError> {
        println!("[{}] {}", channel_id, content);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<String, BotError> {
        println!("[{}] [BOT] {}", channel_id, content);
        for attachment in attachments {
            println!("  [Attachment] {} ({})", attachment.filename, attachment.url);
        }
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn info(&self) -> DeliveryInfo {
        self.info.clone()
    }
}
