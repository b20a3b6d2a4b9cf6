//! Domain layer - Core business objects and seams
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, EventContext, Command)
//! - Traits: Abstractions for infrastructure (NotificationBus, MessageDelivery)

pub mod entities;
pub mod traits;
