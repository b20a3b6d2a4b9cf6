//! Command groups - prefixed commands gated by the access policy
//!
//! Every registered command owns one `messageCreate` listener. For each
//! incoming message the listener runs, in order:
//!
//! 1. author must be on the allow list
//! 2. `safe` commands additionally need the author on the safe list
//! 3. author must not be on the block list
//! 4. the message must have content and a guild
//! 5. content must start with `{prefix}{name}` (literal, case-sensitive)
//! 6. the guild must not be blacklisted
//! 7. the command's debounce window must be idle
//!
//! The first failing check drops the message silently.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use crate::application::errors::DispatchError;
use crate::application::services::AccessPolicy;
use crate::domain::entities::{
    Command, CommandOptions, CommandRegistry, EventContext, EventKind, DEFAULT_DEBOUNCE,
};

use super::events::EventHub;

/// Prefix used when a group is created without one
pub const DEFAULT_PREFIX: &str = "--";

/// A set of commands sharing one prefix.
///
/// Cloning yields another handle to the same group.
#[derive(Clone)]
pub struct CommandGroup {
    prefix: Arc<RwLock<String>>,
    commands: Arc<Mutex<CommandRegistry>>,
    hub: EventHub,
    policy: Arc<AccessPolicy>,
    debounce: Duration,
}

impl CommandGroup {
    /// Create a group; a missing or empty prefix falls back to `--`
    pub fn new(hub: EventHub, policy: Arc<AccessPolicy>, prefix: Option<&str>) -> Self {
        let prefix = prefix.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PREFIX);
        Self {
            prefix: Arc::new(RwLock::new(prefix.to_string())),
            commands: Arc::new(Mutex::new(CommandRegistry::new())),
            hub,
            policy,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Debounce window for commands registered after this call
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn prefix(&self) -> String {
        self.prefix
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the prefix; applies to already-registered commands on the next event
    pub fn update_prefix(&self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        tracing::info!(prefix = %prefix, "Updating command prefix");
        *self.prefix.write().unwrap_or_else(PoisonError::into_inner) = prefix;
    }

    fn registry(&self) -> MutexGuard<'_, CommandRegistry> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a command and wire its `messageCreate` listener
    pub fn register_command<F>(
        &self,
        name: impl Into<String>,
        callback: F,
        options: CommandOptions,
    ) -> Result<(), DispatchError>
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        let command = Arc::new(
            Command::new(name, callback)
                .with_options(options)
                .with_debounce(self.debounce),
        );

        if !self.registry().register(Arc::clone(&command)) {
            return Err(DispatchError::DuplicateCommand(command.name.clone()));
        }

        tracing::debug!(
            command = %command.name,
            safe = command.options.safe,
            "Registered command"
        );

        let prefix = Arc::clone(&self.prefix);
        let policy = Arc::clone(&self.policy);
        self.hub.on(EventKind::MessageCreate, move |ctx| {
            let prefix = prefix
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            dispatch(&policy, &prefix, &command, ctx);
        });

        Ok(())
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry().all().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }

    /// One-line help entry for a command
    pub fn describe(&self, name: &str) -> Option<String> {
        let registry = self.registry();
        let cmd = registry.get(name)?;
        Some(format!(
            "{}{} - {}",
            self.prefix(),
            cmd.name,
            cmd.options.description.as_deref().unwrap_or("No description")
        ))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry().contains(name)
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }
}

/// Run the gate for one command against one event.
///
/// Returns true when the callback was invoked.
pub fn dispatch(policy: &AccessPolicy, prefix: &str, command: &Command, ctx: &EventContext) -> bool {
    let Some(message) = ctx.message.as_ref() else {
        return false;
    };
    let author = message.author_id();

    if !policy.is_allowed(author) {
        return false;
    }
    if command.options.safe && !policy.is_safe(author) {
        return false;
    }
    if policy.is_blocked(author) {
        return false;
    }

    let (Some(content), Some(guild_id)) = (message.text(), message.guild()) else {
        return false;
    };
    if !command.matches(prefix, content) {
        return false;
    }
    if policy.is_blacklisted(guild_id) {
        return false;
    }

    if !command.debounce.try_acquire() {
        return false;
    }

    command.invoke(ctx);
    true
}
