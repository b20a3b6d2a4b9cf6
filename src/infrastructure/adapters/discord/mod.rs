//! Discord REST delivery adapter

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::traits::{Attachment, DeliveryInfo, MessageDelivery};

/// Discord API base URL
const API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    content: &'a str,
    tts: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed<'a>>,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    url: &'a str,
    image: EmbedImage<'a>,
}

#[derive(Debug, Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: String,
}

/// Discord delivery adapter posting through the channel messages endpoint
pub struct DiscordAdapter {
    token: String,
    client: Client,
    base_url: String,
    info: DeliveryInfo,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            base_url: API_BASE.to_string(),
            info: DeliveryInfo {
                id: "discord".to_string(),
                name: "aqua".to_string(),
            },
        }
    }

    /// Point the adapter at another API root, e.g. a local proxy
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.base_url, channel_id)
    }

    async fn create_message(&self, channel_id: &str, request: &CreateMessageRequest<'_>) -> Result<String, BotError> {
        let response = self.client
            .post(self.messages_url(channel_id))
            .header("Authorization", format!("Bot {}", self.token))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BotError::Auth(format!("Discord API error: {}", status)));
        }
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Delivery(format!("Discord API error {}: {}", status, error)));
        }

        let created: CreatedMessage = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(created.id)
    }
}

#[async_trait]
impl MessageDelivery for DiscordAdapter {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, BotError> {
        let request = CreateMessageRequest {
            content,
            tts: false,
            embeds: Vec::new(),
        };
        self.create_message(channel_id, &request).await
    }

    async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<String, BotError> {
        let request = CreateMessageRequest {
            content,
            tts: false,
            embeds: attachments
                .iter()
                .map(|a| Embed {
                    title: &a.filename,
                    url: &a.url,
                    image: EmbedImage { url: &a.url },
                })
                .collect(),
        };
        self.create_message(channel_id, &request).await
    }

    fn info(&self) -> DeliveryInfo {
        self.info.clone()
    }
}
