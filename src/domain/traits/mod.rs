//! Domain traits - Abstractions for infrastructure implementations

pub mod bus;
pub mod delivery;

pub use bus::{Listener, NotificationBus};
pub use delivery::{Attachment, DeliveryInfo, MessageDelivery};
