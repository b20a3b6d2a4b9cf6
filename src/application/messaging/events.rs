//! Event hub - maps logical event kinds onto bus channels

use std::sync::Arc;

use crate::application::errors::DispatchError;
use crate::domain::entities::{EventContext, EventKind};
use crate::domain::traits::{Listener, NotificationBus};

/// Subscribes listeners to the external notification bus by event kind
#[derive(Clone)]
pub struct EventHub {
    bus: Arc<dyn NotificationBus>,
}

impl EventHub {
    pub fn new(bus: Arc<dyn NotificationBus>) -> Self {
        Self { bus }
    }

    /// Subscribe a listener to one event kind for the life of the bus
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(listener));
    }

    /// Subscribe by event name, e.g. `"messageCreate"`
    pub fn on_named<F>(&self, event: &str, listener: F) -> Result<(), DispatchError>
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        let kind: EventKind = event.parse()?;
        self.on(kind, listener);
        Ok(())
    }

    pub fn subscribe(&self, kind: EventKind, listener: Listener) {
        tracing::debug!(event = %kind, channel = kind.channel(), "Subscribing listener");
        self.bus.subscribe(kind.channel(), listener);
    }
}
