//! Aqua - prefixed command dispatch with access-control gating
//!
//! Commands are registered on a [`CommandGroup`] and fire for `messageCreate`
//! events that pass the allow / safe / block / guild-blacklist checks, match
//! the group prefix, and fall outside the command's debounce window.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::errors::{BotError, ConfigError, DispatchError};
pub use application::messaging::{Aqua, CommandGroup, EventHub};
pub use application::services::{AccessList, AccessPolicy};
pub use domain::entities::{CommandOptions, EventContext, EventKind, Message, User};
pub use domain::traits::{Attachment, MessageDelivery, NotificationBus};
pub use infrastructure::bus::LocalBus;
pub use infrastructure::config::Config;
