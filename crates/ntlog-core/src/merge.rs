//! Merge one new entry into a store under a retention policy

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::entry::{LogEntry, LogStore};
use crate::error::{NtlogError, Result};
use crate::retention::RetentionPolicy;

/// What happened to the new entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The entry was added to the store
    Inserted,
    /// An identical entry was already stored; nothing changed for it
    AlreadyPresent,
}

/// Result of a merge
#[derive(Debug, Clone)]
pub struct Merged {
    pub store: LogStore,
    pub outcome: MergeOutcome,
    /// Existing entries removed by retention
    pub dropped: usize,
}

/// Filter `store` with `policy` and add `entry`.
///
/// Re-merging an entry that is already stored with the same text leaves the
/// store as it was: the stored copy does not take up the slot the retention
/// filter reserves for the new entry. A surviving entry with the same key but
/// different text is a [`NtlogError::DuplicateKeyConflict`].
///
/// The new entry is placed by timestamp, so backfilled entries keep the store
/// newest-first. It is always kept: the count ceiling trims the existing
/// entries, so a backfilled entry older than all of them still displaces the
/// oldest one.
pub fn merge_entry(
    mut store: LogStore,
    entry: LogEntry,
    policy: &RetentionPolicy,
    now: DateTime<FixedOffset>,
) -> Result<Merged> {
    let already_present = store
        .get(&entry.key)
        .is_some_and(|existing| existing.text == entry.text);
    let outcome = if already_present {
        store.remove(&entry.key);
        MergeOutcome::AlreadyPresent
    } else {
        MergeOutcome::Inserted
    };

    let before = store.len();
    let mut store = policy.apply(store, now);
    let dropped = before - store.len();

    if store.contains_key(&entry.key) {
        return Err(NtlogError::DuplicateKeyConflict {
            key: entry.key.encode(),
        });
    }

    debug!(key = %entry.key, ?outcome, dropped, "merge_entry");
    store.insert_sorted(entry);

    Ok(Merged {
        store,
        outcome,
        dropped,
    })
}
