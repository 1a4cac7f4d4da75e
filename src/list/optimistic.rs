//! Optimistic status toggles with explicit rollback.

use std::fmt::Debug;

use crate::models::agent::Agent;
use crate::models::ai_model::AiModelConfig;
use crate::models::knowledge_base::KnowledgeBase;
use crate::models::mcp_tool::McpTool;

/// A record a list controller can address by key.
pub trait ListItem: Clone + Send + Sync + 'static {
    type Key: Clone + PartialEq + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// A record with an on/off switch the console can flip.
pub trait ActiveFlag: ListItem {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

/// Outcome of one optimistic update.
#[derive(Debug, Clone, PartialEq)]
pub enum Optimistic<T> {
    /// Backend accepted; holds the server's record.
    Committed(T),
    /// Backend refused; the flag is back to the last confirmed value.
    RolledBack,
}

/// Handle for one toggle in flight, returned by [`PendingToggles::start`].
#[derive(Debug, Clone)]
pub(crate) struct ToggleTicket<K> {
    pub key: K,
    pub requested: bool,
    /// `ViewState::commits` when the toggle was applied.
    pub commits: u64,
    seq: u64,
}

/// How a settled toggle should touch the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settled {
    /// No later toggle of the same item was started after this one.
    pub latest: bool,
    /// Last flag value the backend confirmed for the item.
    pub confirmed: bool,
}

#[derive(Debug)]
struct ToggleEntry<K> {
    key: K,
    confirmed: bool,
    latest: u64,
    in_flight: usize,
}

/// Toggles in flight, per item. Overlapping toggles of one item share a
/// single confirmed value, so a rollback never lands on a value that only
/// an earlier, unconfirmed toggle produced.
#[derive(Debug)]
pub(crate) struct PendingToggles<K> {
    entries: Vec<ToggleEntry<K>>,
    next_seq: u64,
}

impl<K> Default for PendingToggles<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Clone + PartialEq> PendingToggles<K> {
    /// Register a toggle of `key` from `current` to `requested`. `current` is
    /// taken as confirmed only when nothing else is in flight for the item.
    pub fn start(&mut self, key: K, current: bool, requested: bool, commits: u64) -> ToggleTicket<K> {
        self.next_seq += 1;
        let seq = self.next_seq;
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.latest = seq;
                entry.in_flight += 1;
            }
            None => self.entries.push(ToggleEntry {
                key: key.clone(),
                confirmed: current,
                latest: seq,
                in_flight: 1,
            }),
        }
        ToggleTicket {
            key,
            requested,
            commits,
            seq,
        }
    }

    /// Settle `ticket`. `server` is the flag the backend answered with, or
    /// `None` when the call failed.
    pub fn finish(&mut self, ticket: &ToggleTicket<K>, server: Option<bool>) -> Settled {
        let Some(index) = self.entries.iter().position(|e| e.key == ticket.key) else {
            return Settled {
                latest: true,
                confirmed: server.unwrap_or(!ticket.requested),
            };
        };
        let entry = &mut self.entries[index];
        if let Some(active) = server {
            entry.confirmed = active;
        }
        entry.in_flight = entry.in_flight.saturating_sub(1);
        let settled = Settled {
            latest: entry.latest == ticket.seq,
            confirmed: entry.confirmed,
        };
        if entry.in_flight == 0 {
            self.entries.swap_remove(index);
        }
        settled
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }
}

impl ListItem for Agent {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl ActiveFlag for Agent {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl ListItem for McpTool {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl ActiveFlag for McpTool {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl ListItem for KnowledgeBase {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl ListItem for AiModelConfig {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}
