//! Log entries and the in-memory, newest-first log store

use std::collections::HashSet;

use crate::error::{NtlogError, Result};
use crate::key::LogKey;

/// One timestamped contribution to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub key: LogKey,
    /// Verbatim log text, possibly multi-line
    pub text: String,
}

impl LogEntry {
    pub fn new(key: LogKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }
}

/// Ordered log entries, newest first, plus a key set for collision lookups.
///
/// The entry vector is authoritative; `keys` always mirrors it.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    keys: HashSet<LogKey>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries in any order.
    ///
    /// Two entries whose keys decode to the same instant and description are
    /// collapsed when their text matches and rejected otherwise.
    pub fn from_entries(entries: impl IntoIterator<Item = LogEntry>) -> Result<Self> {
        let mut store = Self::new();
        for entry in entries {
            if let Some(existing) = store.get(&entry.key) {
                if existing.text != entry.text {
                    return Err(NtlogError::DuplicateKeyConflict {
                        key: entry.key.encode(),
                    });
                }
                continue;
            }
            store.keys.insert(entry.key.clone());
            store.entries.push(entry);
        }
        store.entries.sort_by(|a, b| b.key.cmp(&a.key));
        Ok(store)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &LogKey) -> bool {
        self.keys.contains(key)
    }

    pub fn get(&self, key: &LogKey) -> Option<&LogEntry> {
        if !self.keys.contains(key) {
            return None;
        }
        self.entries.iter().find(|entry| &entry.key == key)
    }

    /// Remove and return the entry stored under `key`.
    pub fn remove(&mut self, key: &LogKey) -> Option<LogEntry> {
        if !self.keys.remove(key) {
            return None;
        }
        let pos = self.entries.iter().position(|entry| &entry.key == key)?;
        Some(self.entries.remove(pos))
    }

    /// Keep only the `count` newest entries.
    pub fn truncate(&mut self, count: usize) {
        for dropped in self.entries.drain(count.min(self.entries.len())..) {
            self.keys.remove(&dropped.key);
        }
    }

    /// Keep only the entries matching `keep`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&LogEntry) -> bool) {
        let keys = &mut self.keys;
        self.entries.retain(|entry| {
            let kept = keep(entry);
            if !kept {
                keys.remove(&entry.key);
            }
            kept
        });
    }

    /// Insert an entry whose key is not yet present at its newest-first
    /// position; entries with an equal timestamp stay ahead of it.
    pub(crate) fn insert_sorted(&mut self, entry: LogEntry) {
        let timestamp = *entry.key.timestamp();
        let pos = self
            .entries
            .partition_point(|existing| *existing.key.timestamp() >= timestamp);
        self.keys.insert(entry.key.clone());
        self.entries.insert(pos, entry);
    }
}
