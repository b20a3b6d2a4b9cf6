use super::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a server/community context
pub type GuildId = String;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A chat message as delivered by the notification bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "new_id", deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "super::id::string_or_number")]
    pub channel_id: String,
    #[serde(default, deserialize_with = "super::id::optional_string_or_number")]
    pub guild_id: Option<GuildId>,
    pub author: User,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User) -> Self {
        Self {
            id: new_id(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            content: None,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(channel_id: impl Into<String>, author: User, text: impl Into<String>) -> Self {
        Self::new(channel_id, author).with_content(text)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_guild(mut self, guild_id: impl Into<GuildId>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    /// Message text, treating an empty string as no content
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|s| !s.is_empty())
    }

    /// Guild the message was posted in; direct messages have none
    pub fn guild(&self) -> Option<&str> {
        self.guild_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn author_id(&self) -> &str {
        &self.author.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_count_as_absent() {
        let msg = Message::from_text("c1", User::new("u1"), "").with_guild("");
        assert_eq!(msg.text(), None);
        assert_eq!(msg.guild(), None);
    }

    #[test]
    fn decodes_bus_payload_with_defaults() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "channel_id": "c9",
            "guild_id": "g1",
            "author": { "id": "42", "username": "aqua" },
            "content": "--ping"
        }))
        .unwrap();

        assert_eq!(msg.author_id(), "42");
        assert_eq!(msg.text(), Some("--ping"));
        assert_eq!(msg.guild(), Some("g1"));
        assert!(!msg.id.is_empty());
    }
}
