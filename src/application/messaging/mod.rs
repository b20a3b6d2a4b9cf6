//! Message handling - Event subscription, command groups and dispatch

pub mod dispatcher;
pub mod events;
pub mod group;

pub use dispatcher::Aqua;
pub use events::EventHub;
pub use group::{dispatch, CommandGroup, DEFAULT_PREFIX};
