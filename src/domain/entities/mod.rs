//! Domain entities - Core business objects

pub mod id;
pub mod user;
pub mod message;
pub mod event;
pub mod command;

pub use user::{Identity, User};
pub use message::{GuildId, Message};
pub use event::{EventContext, EventKind};
pub use command::{Command, CommandCallback, CommandOptions, CommandRegistry, Debounce, DEFAULT_DEBOUNCE};
