use std::sync::Arc;

use crate::domain::entities::EventContext;

/// Listener invoked for every event published on a subscribed channel
pub type Listener = Arc<dyn Fn(&EventContext) + Send + Sync>;

/// NotificationBus trait - abstraction over the external publish/subscribe system
///
/// Subscriptions are permanent; there is no unsubscribe.
pub trait NotificationBus: Send + Sync {
    /// Register a listener on a bus channel such as `MESSAGE_CREATE`
    fn subscribe(&self, channel: &str, listener: Listener);
}
