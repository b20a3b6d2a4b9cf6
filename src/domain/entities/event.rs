//! Event kinds and the context delivered with each event

use std::fmt;
use std::str::FromStr;

use super::{Message, User};
use crate::application::errors::{BotError, DispatchError};

/// Logical event kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    LoadMessages,
    UserUpdate,
    CurrentUserUpdate,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::MessageCreate,
        EventKind::MessageUpdate,
        EventKind::MessageDelete,
        EventKind::LoadMessages,
        EventKind::UserUpdate,
        EventKind::CurrentUserUpdate,
    ];

    /// Name used by callers of `on`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MessageCreate => "messageCreate",
            EventKind::MessageUpdate => "messageUpdate",
            EventKind::MessageDelete => "messageDelete",
            EventKind::LoadMessages => "loadMessages",
            EventKind::UserUpdate => "userUpdate",
            EventKind::CurrentUserUpdate => "currentUserUpdate",
        }
    }

    /// Channel name on the notification bus
    pub fn channel(&self) -> &'static str {
        match self {
            EventKind::MessageCreate => "MESSAGE_CREATE",
            EventKind::MessageUpdate => "MESSAGE_UPDATE",
            EventKind::MessageDelete => "MESSAGE_DELETE",
            EventKind::LoadMessages => "LOAD_MESSAGES",
            EventKind::UserUpdate => "USER_UPDATE",
            EventKind::CurrentUserUpdate => "CURRENT_USER_UPDATE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownEventKind(s.to_string()))
    }
}

/// Context object handed to every listener
#[derive(Debug, Clone)]
pub struct EventContext {
    pub kind: EventKind,
    pub message: Option<Message>,
    pub user: Option<User>,
    pub raw: Option<serde_json::Value>,
}

impl EventContext {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            message: None,
            user: None,
            raw: None,
        }
    }

    pub fn message_created(message: Message) -> Self {
        Self::new(EventKind::MessageCreate).with_message(message)
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Decode a bus payload of the shape `{"message": {...}, "user": {...}}`
    pub fn from_json(kind: EventKind, value: serde_json::Value) -> Result<Self, BotError> {
        let decode = |key: &str| value.get(key).filter(|v| !v.is_null()).cloned();

        let message = decode("message")
            .map(serde_json::from_value::<Message>)
            .transpose()
            .map_err(|e| BotError::Parse(format!("{} message: {}", kind, e)))?;
        let user = decode("user")
            .map(serde_json::from_value::<User>)
            .transpose()
            .map_err(|e| BotError::Parse(format!("{} user: {}", kind, e)))?;

        Ok(Self {
            kind,
            message,
            user,
            raw: Some(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_name() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn maps_kinds_to_bus_channels() {
        let expected = [
            "MESSAGE_CREATE",
            "MESSAGE_UPDATE",
            "MESSAGE_DELETE",
            "LOAD_MESSAGES",
            "USER_UPDATE",
            "CURRENT_USER_UPDATE",
        ];
        for (kind, channel) in EventKind::ALL.into_iter().zip(expected) {
            assert_eq!(kind.channel(), channel, "{}", kind);
        }
    }

    #[test]
    fn decodes_numeric_ids_as_strings() {
        let ctx = EventContext::from_json(
            EventKind::MessageCreate,
            serde_json::json!({
                "message": {
                    "id": 99,
                    "channel_id": 7,
                    "guild_id": 555,
                    "author": { "id": 1234 },
                    "content": "--ping"
                },
                "user": { "id": 80351110224678912u64 }
            }),
        )
        .unwrap();

        let message = ctx.message.unwrap();
        assert_eq!(message.id, "99");
        assert_eq!(message.channel_id, "7");
        assert_eq!(message.author_id(), "1234");
        assert_eq!(message.guild(), Some("555"));
        assert_eq!(ctx.user.unwrap().id, "80351110224678912");
    }

    #[test]
    fn null_guild_decodes_as_absent() {
        let ctx = EventContext::from_json(
            EventKind::MessageCreate,
            serde_json::json!({
                "message": { "guild_id": null, "author": { "id": "u1" }, "content": "--ping" }
            }),
        )
        .unwrap();
        assert_eq!(ctx.message.unwrap().guild(), None);
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "MESSAGE_CREATE".parse::<EventKind>(),
            Err(DispatchError::UnknownEventKind("MESSAGE_CREATE".into()))
        );
        assert!("".parse::<EventKind>().is_err());
    }

    #[test]
    fn decodes_json_payload() {
        let ctx = EventContext::from_json(
            EventKind::MessageCreate,
            serde_json::json!({
                "message": {
                    "channel_id": "c1",
                    "guild_id": "g1",
                    "author": { "id": "u1" },
                    "content": "!ping"
                }
            }),
        )
        .unwrap();

        let message = ctx.message.unwrap();
        assert_eq!(message.author_id(), "u1");
        assert_eq!(message.text(), Some("!ping"));
        assert!(ctx.user.is_none());
        assert!(ctx.raw.is_some());
    }

    #[test]
    fn reports_malformed_payload() {
        let err = EventContext::from_json(
            EventKind::UserUpdate,
            serde_json::json!({ "user": { "name": "no id" } }),
        )
        .unwrap_err();
        assert!(matches!(err, BotError::Parse(_)));
    }
}
