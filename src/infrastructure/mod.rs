//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Bus: In-process notification bus
//! - Adapters: Delivery transports (console, Discord)

pub mod config;
pub mod bus;
pub mod adapters;
