//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Access policy and outbound delivery
//! - Errors: Domain-specific errors
//! - Messaging: Event hub, command groups, dispatcher facade

pub mod errors;
pub mod services;
pub mod messaging;
