//! Access policy - four independent membership lists gating command dispatch

use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The four lists an access policy keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessList {
    /// Identities allowed to trigger any command at all
    Allow,
    /// Identities explicitly denied, overriding allow
    Block,
    /// Identities allowed to trigger commands flagged `safe`
    Safe,
    /// Guilds in which no command fires
    GuildBlacklist,
}

impl AccessList {
    pub const ALL: [AccessList; 4] = [
        AccessList::Allow,
        AccessList::Block,
        AccessList::Safe,
        AccessList::GuildBlacklist,
    ];
}

impl fmt::Display for AccessList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessList::Allow => "allow",
            AccessList::Block => "block",
            AccessList::Safe => "safe",
            AccessList::GuildBlacklist => "guild-blacklist",
        })
    }
}

#[derive(Debug, Default)]
struct Lists {
    allow: HashSet<String>,
    block: HashSet<String>,
    safe: HashSet<String>,
    guild_blacklist: HashSet<String>,
}

impl Lists {
    fn get(&self, list: AccessList) -> &HashSet<String> {
        match list {
            AccessList::Allow => &self.allow,
            AccessList::Block => &self.block,
            AccessList::Safe => &self.safe,
            AccessList::GuildBlacklist => &self.guild_blacklist,
        }
    }

    fn get_mut(&mut self, list: AccessList) -> &mut HashSet<String> {
        match list {
            AccessList::Allow => &mut self.allow,
            AccessList::Block => &mut self.block,
            AccessList::Safe => &mut self.safe,
            AccessList::GuildBlacklist => &mut self.guild_blacklist,
        }
    }
}

/// Shared, read-mostly access policy.
///
/// Queries never fail: a key that is absent simply evaluates false. Every
/// mutation is one set insert or delete under the write lock, so readers
/// never observe a partial update.
#[derive(Debug, Default)]
pub struct AccessPolicy {
    lists: RwLock<Lists>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from `(list, key)` seed pairs
    pub fn from_seeds<I, K>(seeds: I) -> Self
    where
        I: IntoIterator<Item = (AccessList, K)>,
        K: Into<String>,
    {
        let policy = Self::new();
        for (list, key) in seeds {
            policy.insert(list, key);
        }
        tracing::debug!(
            allow = policy.len(AccessList::Allow),
            block = policy.len(AccessList::Block),
            safe = policy.len(AccessList::Safe),
            guild_blacklist = policy.len(AccessList::GuildBlacklist),
            "Access policy seeded"
        );
        policy
    }

    fn read(&self) -> RwLockReadGuard<'_, Lists> {
        self.lists.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Lists> {
        self.lists.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_blacklisted(&self, guild_id: &str) -> bool {
        self.contains(AccessList::GuildBlacklist, guild_id)
    }

    pub fn is_blocked(&self, identity: &str) -> bool {
        self.contains(AccessList::Block, identity)
    }

    pub fn is_safe(&self, identity: &str) -> bool {
        self.contains(AccessList::Safe, identity)
    }

    pub fn is_allowed(&self, identity: &str) -> bool {
        self.contains(AccessList::Allow, identity)
    }

    pub fn contains(&self, list: AccessList, key: &str) -> bool {
        self.read().get(list).contains(key)
    }

    pub fn len(&self, list: AccessList) -> usize {
        self.read().get(list).len()
    }

    /// Add a key to a list; returns false if it was already present
    pub fn insert(&self, list: AccessList, key: impl Into<String>) -> bool {
        let key = key.into();
        tracing::debug!(%list, key = %key, "Access list insert");
        self.write().get_mut(list).insert(key)
    }

    /// Remove a key from a list; returns false if it was not present
    pub fn remove(&self, list: AccessList, key: &str) -> bool {
        tracing::debug!(%list, key, "Access list remove");
        self.write().get_mut(list).remove(key)
    }

    pub fn allow(&self, identity: impl Into<String>) -> bool {
        self.insert(AccessList::Allow, identity)
    }

    pub fn disallow(&self, identity: &str) -> bool {
        self.remove(AccessList::Allow, identity)
    }

    pub fn block(&self, identity: impl Into<String>) -> bool {
        self.insert(AccessList::Block, identity)
    }

    pub fn unblock(&self, identity: &str) -> bool {
        self.remove(AccessList::Block, identity)
    }

    pub fn mark_safe(&self, identity: impl Into<String>) -> bool {
        self.insert(AccessList::Safe, identity)
    }

    pub fn unmark_safe(&self, identity: &str) -> bool {
        self.remove(AccessList::Safe, identity)
    }

    pub fn blacklist_guild(&self, guild_id: impl Into<String>) -> bool {
        self.insert(AccessList::GuildBlacklist, guild_id)
    }

    pub fn unblacklist_guild(&self, guild_id: &str) -> bool {
        self.remove(AccessList::GuildBlacklist, guild_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_are_false() {
        let policy = AccessPolicy::new();
        assert!(!policy.is_allowed("u1"));
        assert!(!policy.is_blocked("u1"));
        assert!(!policy.is_safe("u1"));
        assert!(!policy.is_blacklisted("g1"));
    }

    #[test]
    fn lists_are_independent() {
        let policy = AccessPolicy::new();
        policy.allow("u1");
        policy.blacklist_guild("u1");

        assert!(policy.is_allowed("u1"));
        assert!(policy.is_blacklisted("u1"));
        assert!(!policy.is_safe("u1"));
        assert!(!policy.is_blocked("u1"));
    }

    #[test]
    fn mutations_report_changes() {
        let policy = AccessPolicy::new();
        assert!(policy.block("u2"));
        assert!(!policy.block("u2"));
        assert!(policy.is_blocked("u2"));

        assert!(policy.unblock("u2"));
        assert!(!policy.unblock("u2"));
        assert!(!policy.is_blocked("u2"));
    }

    #[test]
    fn seeds_fill_their_own_lists() {
        let policy = AccessPolicy::from_seeds([
            (AccessList::Allow, "u1"),
            (AccessList::Allow, "u1"),
            (AccessList::Safe, "u1"),
            (AccessList::GuildBlacklist, "g1"),
        ]);

        assert!(policy.is_allowed("u1"));
        assert!(policy.is_safe("u1"));
        assert!(policy.is_blacklisted("g1"));
        assert_eq!(policy.len(AccessList::Allow), 1);
        assert_eq!(policy.len(AccessList::Block), 0);
    }
}
