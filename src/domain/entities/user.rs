use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message author
pub type Identity = String;

/// Represents a message author or account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: Identity,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<Identity>) -> Self {
        Self {
            id: id.into(),
            username: None,
            global_name: None,
            bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_global_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> String {
        if let Some(ref name) = self.global_name {
            name.clone()
        } else if let Some(ref username) = self.username {
            username.clone()
        } else {
            self.id.clone()
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
