use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::EventContext;

/// Default debounce window between two invocations of one command
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Command callback type
pub type CommandCallback = Arc<dyn Fn(&EventContext) + Send + Sync>;

/// Options attached to a command at registration time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Only identities on the safe list may trigger the command
    pub safe: bool,
    pub description: Option<String>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Per-command re-entrancy guard.
///
/// Holds a single pending deadline, not a queue. While the deadline lies in
/// the future every acquisition fails; once it passes the guard is idle again.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    pending_until: Mutex<Option<Instant>>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending_until: Mutex::new(None),
        }
    }

    /// Arm the window and return true if idle, false while a window is pending
    pub fn try_acquire(&self) -> bool {
        let mut pending = self
            .pending_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if matches!(*pending, Some(until) if now < until) {
            return false;
        }

        *pending = Some(now + self.window);
        true
    }

    pub fn is_pending(&self) -> bool {
        let pending = self
            .pending_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        matches!(*pending, Some(until) if Instant::now() < until)
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// A registered command
pub struct Command {
    pub name: String,
    pub options: CommandOptions,
    pub callback: CommandCallback,
    pub debounce: Debounce,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&EventContext) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            options: CommandOptions::default(),
            callback: Arc::new(callback),
            debounce: Debounce::default(),
        }
    }

    pub fn with_options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = Debounce::new(window);
        self
    }

    /// Literal start-of-text match against `{prefix}{name}`, case-sensitive
    pub fn matches(&self, prefix: &str, content: &str) -> bool {
        content
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(&self.name))
    }

    pub fn invoke(&self, ctx: &EventContext) {
        (self.callback)(ctx)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

/// Command registry keyed by name
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command; returns false and leaves the registry untouched if
    /// the name is taken
    pub fn register(&mut self, command: Arc<Command>) -> bool {
        if self.commands.contains_key(&command.name) {
            return false;
        }
        self.commands.insert(command.name.clone(), command);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
