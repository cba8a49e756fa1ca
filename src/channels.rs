//! Channel membership tracking.
//!
//! The registry maps each joined channel to the nicknames seen in it.
//! Channel names and nicknames are keyed by their RFC 1459 case-folded
//! form; the spelling last observed is what snapshots report.
//!
//! Mutation is crate-private: only the dispatcher running on the read loop
//! changes membership. Readers get copies and never observe a half-applied
//! update.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::casemap::irc_to_lower;

#[derive(Debug, Clone)]
struct Channel {
    name: String,
    /// folded nickname -> nickname as last seen
    members: HashMap<String, String>,
}

impl Channel {
    fn new(name: &str) -> Self {
        Channel {
            name: name.to_owned(),
            members: HashMap::new(),
        }
    }
}

/// Registry of joined channels and their members.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Channel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry for `channel` if absent. Returns `true` if created.
    pub(crate) fn ensure(&self, channel: &str) -> bool {
        let mut channels = self.channels.write();
        let key = irc_to_lower(channel);
        if channels.contains_key(&key) {
            return false;
        }
        channels.insert(key, Channel::new(channel));
        true
    }

    /// Add `nick` to a known channel. Returns `false` if the channel is not
    /// tracked.
    ///
    /// A nickname already present under another spelling is replaced by the
    /// new one.
    pub(crate) fn add_member(&self, channel: &str, nick: &str) -> bool {
        let mut channels = self.channels.write();
        match channels.get_mut(&irc_to_lower(channel)) {
            Some(chan) => {
                chan.members.insert(irc_to_lower(nick), nick.to_owned());
                true
            }
            None => false,
        }
    }

    /// Remove `nick` from `channel`. Returns `true` if it was a member.
    pub(crate) fn remove_member(&self, channel: &str, nick: &str) -> bool {
        let mut channels = self.channels.write();
        channels
            .get_mut(&irc_to_lower(channel))
            .and_then(|chan| chan.members.remove(&irc_to_lower(nick)))
            .is_some()
    }

    /// Remove `nick` from every channel, returning the channels it left.
    pub(crate) fn remove_member_everywhere(&self, nick: &str) -> Vec<String> {
        let key = irc_to_lower(nick);
        let mut channels = self.channels.write();
        channels
            .values_mut()
            .filter_map(|chan| chan.members.remove(&key).map(|_| chan.name.clone()))
            .collect()
    }

    /// Re-key `old` as `new` in every channel containing `old`.
    ///
    /// Returns the channels that were updated. If `new` was already listed
    /// in one of them, the rename overwrites it.
    pub(crate) fn rename_member(&self, old: &str, new: &str) -> Vec<String> {
        let old_key = irc_to_lower(old);
        let new_key = irc_to_lower(new);
        let mut channels = self.channels.write();
        let mut renamed = Vec::new();
        for chan in channels.values_mut() {
            if chan.members.remove(&old_key).is_some() {
                chan.members.insert(new_key.clone(), new.to_owned());
                renamed.push(chan.name.clone());
            }
        }
        renamed
    }

    /// Forget `channel`. Returns `true` if it was tracked.
    pub(crate) fn remove(&self, channel: &str) -> bool {
        self.channels.write().remove(&irc_to_lower(channel)).is_some()
    }

    pub(crate) fn clear(&self) {
        self.channels.write().clear();
    }

    /// Copy of the member set of `channel`, or `None` if it is not tracked.
    pub fn snapshot(&self, channel: &str) -> Option<HashSet<String>> {
        self.channels
            .read()
            .get(&irc_to_lower(channel))
            .map(|chan| chan.members.values().cloned().collect())
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.read().contains_key(&irc_to_lower(channel))
    }

    /// Whether `nick` is listed in `channel`.
    pub fn is_member(&self, channel: &str, nick: &str) -> bool {
        self.channels
            .read()
            .get(&irc_to_lower(channel))
            .is_some_and(|chan| chan.members.contains_key(&irc_to_lower(nick)))
    }

    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(channel: &str, nicks: &[&str]) -> ChannelRegistry {
        let registry = ChannelRegistry::new();
        registry.ensure(channel);
        for nick in nicks {
            registry.add_member(channel, nick);
        }
        registry
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let registry = ChannelRegistry::new();
        assert!(registry.ensure("#Rust"));
        assert!(!registry.ensure("#rust"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("#RUST"));
    }

    #[test]
    fn test_add_requires_known_channel() {
        let registry = ChannelRegistry::new();
        assert!(!registry.add_member("#x", "bob"));
        assert!(registry.snapshot("#x").is_none());
    }

    #[test]
    fn test_lookup_is_case_folded() {
        let registry = registry_with("#Chan[1]", &["Bob"]);
        assert!(registry.is_member("#chan{1}", "BOB"));
        let members = registry.snapshot("#CHAN[1]").unwrap();
        assert!(members.contains("Bob"));
    }

    #[test]
    fn test_remove_member() {
        let registry = registry_with("#x", &["bob", "alice"]);
        assert!(registry.remove_member("#x", "BOB"));
        assert!(!registry.remove_member("#x", "bob"));
        let members = registry.snapshot("#x").unwrap();
        assert_eq!(members.len(), 1);
        assert!(members.contains("alice"));
    }

    #[test]
    fn test_remove_everywhere() {
        let registry = registry_with("#x", &["bob", "alice"]);
        registry.ensure("#y");
        registry.add_member("#y", "bob");
        registry.ensure("#z");
        registry.add_member("#z", "alice");

        let mut left = registry.remove_member_everywhere("bob");
        left.sort();
        assert_eq!(left, vec!["#x".to_string(), "#y".to_string()]);
        assert!(!registry.is_member("#x", "bob"));
        assert!(!registry.is_member("#y", "bob"));
        assert!(registry.is_member("#z", "alice"));
    }

    #[test]
    fn test_rename_in_every_channel() {
        let registry = registry_with("#x", &["bob"]);
        registry.ensure("#y");
        registry.add_member("#y", "bob");
        registry.ensure("#z");
        registry.add_member("#z", "carol");

        let renamed = registry.rename_member("bob", "robert");
        assert_eq!(renamed.len(), 2);
        for chan in ["#x", "#y"] {
            let members = registry.snapshot(chan).unwrap();
            assert!(members.contains("robert"));
            assert!(!members.contains("bob"));
        }
        assert!(!registry.is_member("#z", "robert"));
    }

    #[test]
    fn test_rename_case_only_updates_spelling() {
        let registry = registry_with("#x", &["bob"]);
        registry.rename_member("bob", "Bob");
        let members = registry.snapshot("#x").unwrap();
        assert_eq!(members.len(), 1);
        assert!(members.contains("Bob"));
    }

    #[test]
    fn test_last_rename_wins_on_collision() {
        let registry = registry_with("#x", &["bob", "robert"]);
        registry.rename_member("bob", "Robert");
        let members = registry.snapshot("#x").unwrap();
        assert_eq!(members.len(), 1);
        assert!(members.contains("Robert"));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = registry_with("#x", &["bob"]);
        let before = registry.snapshot("#x").unwrap();
        registry.add_member("#x", "alice");
        assert_eq!(before.len(), 1);
        assert_eq!(registry.snapshot("#x").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let registry = registry_with("#x", &["bob"]);
        registry.ensure("#y");
        assert!(registry.remove("#X"));
        assert!(!registry.contains("#x"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
