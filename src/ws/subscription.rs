//! Per-connection subscription filter.
//!
//! A connection receives a [`MemberEvent`] only if the event's guild is
//! subscribed (explicitly or via the `"*"` wildcard) and, when an event-name
//! filter is set, the event's name is in it.

use std::collections::HashSet;

use crate::domain::{GuildId, MemberEvent};

/// Guild and event-name filter for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed guilds. Ignored while `all_guilds` is set.
    guild_ids: HashSet<GuildId>,
    /// Wildcard guild subscription (`"*"`).
    all_guilds: bool,
    /// Accepted event names. `None` accepts every event.
    event_names: Option<HashSet<&'static str>>,
}

impl SubscriptionManager {
    /// Creates a filter that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds guilds to the filter; `wildcard` subscribes to every guild.
    pub fn subscribe(&mut self, ids: &[GuildId], wildcard: bool) {
        self.all_guilds |= wildcard;
        self.guild_ids.extend(ids.iter().copied());
    }

    /// Removes guilds from the filter; `wildcard` clears the wildcard
    /// subscription and every explicit guild.
    pub fn unsubscribe(&mut self, ids: &[GuildId], wildcard: bool) {
        if wildcard {
            self.all_guilds = false;
            self.guild_ids.clear();
            return;
        }
        for id in ids {
            self.guild_ids.remove(id);
        }
    }

    /// Restricts delivery to the named events. Unknown names are ignored
    /// and returned; an empty `names` slice removes the restriction.
    pub fn filter_events(&mut self, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            self.event_names = None;
            return Vec::new();
        }

        let mut accepted = HashSet::new();
        let mut unknown = Vec::new();
        for name in names {
            match MemberEvent::NAMES.iter().find(|known| **known == name.as_str()) {
                Some(known) => {
                    accepted.insert(*known);
                }
                None => unknown.push(name.clone()),
            }
        }
        self.event_names = Some(accepted);
        unknown
    }

    /// Returns `true` if `event` passes the filter.
    #[must_use]
    pub fn matches(&self, event: &MemberEvent) -> bool {
        let guild_ok = self.all_guilds || self.guild_ids.contains(&event.guild_id());
        let name_ok = self
            .event_names
            .as_ref()
            .is_none_or(|names| names.contains(event.name()));
        guild_ok && name_ok
    }

    /// Returns the number of explicitly subscribed guilds.
    #[must_use]
    pub fn count(&self) -> usize {
        self.guild_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.all_guilds
    }
}
