//! In-process notification bus

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::entities::EventContext;
use crate::domain::traits::{Listener, NotificationBus};

/// Channel-keyed publish/subscribe bus living in the current process
#[derive(Default)]
pub struct LocalBus {
    subscribers: RwLock<HashMap<String, Vec<Listener>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every listener on `channel`, in subscription order.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe
    /// from inside a delivery; those join from the next publish on.
    pub fn publish(&self, channel: &str, ctx: &EventContext) -> usize {
        let listeners: Vec<Listener> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .unwrap_or_default();

        for listener in &listeners {
            listener(ctx);
        }
        listeners.len()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .map_or(0, Vec::len)
    }

    pub fn subscriber_count_total(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl NotificationBus for LocalBus {
    fn subscribe(&self, channel: &str, listener: Listener) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(channel.to_string())
            .or_default()
            .push(listener);
    }
}
