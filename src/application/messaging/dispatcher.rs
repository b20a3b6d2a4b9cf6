//! Dispatcher facade - single entry point for listeners, command groups and sends

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::application::errors::{BotError, DispatchError};
use crate::application::services::{AccessPolicy, OutboundService};
use crate::domain::entities::{EventContext, EventKind, DEFAULT_DEBOUNCE};
use crate::domain::traits::{Attachment, MessageDelivery, NotificationBus};

use super::events::EventHub;
use super::group::CommandGroup;

/// Composes the event hub, the access policy and the outbound service.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Aqua {
    hub: EventHub,
    policy: Arc<AccessPolicy>,
    outbound: OutboundService,
    debounce: Duration,
}

impl Aqua {
    pub fn new(
        bus: Arc<dyn NotificationBus>,
        delivery: Arc<dyn MessageDelivery>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            hub: EventHub::new(bus),
            policy: Arc::new(policy),
            outbound: OutboundService::new(delivery),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.outbound = self.outbound.with_send_delay(delay);
        self
    }

    /// Raw subscription by event name; bypasses access control and prefixes
    pub fn on<F>(&self, event: &str, callback: F) -> Result<(), DispatchError>
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        self.hub.on_named(event, callback)
    }

    pub fn on_kind<F>(&self, kind: EventKind, callback: F)
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        self.hub.on(kind, callback)
    }

    /// Create a command group sharing this dispatcher's policy and bus
    pub fn command_group(&self, prefix: Option<&str>) -> CommandGroup {
        CommandGroup::new(self.hub.clone(), Arc::clone(&self.policy), prefix)
            .with_debounce(self.debounce)
    }

    pub fn policy(&self) -> &Arc<AccessPolicy> {
        &self.policy
    }

    pub fn is_blacklisted(&self, guild_id: &str) -> bool {
        self.policy.is_blacklisted(guild_id)
    }

    pub fn is_blocked(&self, identity: &str) -> bool {
        self.policy.is_blocked(identity)
    }

    pub fn is_safe(&self, identity: &str) -> bool {
        self.policy.is_safe(identity)
    }

    pub fn is_allowed(&self, identity: &str) -> bool {
        self.policy.is_allowed(identity)
    }

    /// Send a message after the send delay.
    ///
    /// Deprecated for bulk use: sending in mass quantities can get the
    /// account banned by the platform.
    pub fn send_message(
        &self,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> JoinHandle<Result<String, BotError>> {
        self.outbound.send_message(channel_id, content)
    }

    /// Send a bot-authored message
    pub async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<String, BotError> {
        self.outbound
            .send_bot_message(channel_id, content, attachments)
            .await
    }
}
