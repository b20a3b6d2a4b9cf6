//! Application services - Access policy and outbound delivery

pub mod access_policy;
pub mod outbound;

pub use access_policy::{AccessList, AccessPolicy};
pub use outbound::{OutboundService, DEFAULT_SEND_DELAY};
