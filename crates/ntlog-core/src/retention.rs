//! Age and count based retention
//!
//! The filter runs on the store *before* the new entry is merged, so every count
//! bound is checked against what may remain ahead of the new entry: it always
//! leaves room for exactly one more.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::debug;

use crate::entry::LogStore;

/// Controls which existing entries survive a merge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Entries older than this are dropped; `None` or zero keeps entries of any age
    pub max_age: Option<Duration>,
    /// Age filtering never leaves fewer than this many entries after the merge
    pub min_count: usize,
    /// Upper bound on entries after the merge
    pub max_count: Option<usize>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age: None,
            min_count: 1,
            max_count: None,
        }
    }
}

impl RetentionPolicy {
    /// Specifies the maximum age of retained entries.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Specifies the minimum number of entries to keep, regardless of age.
    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count.max(1);
        self
    }

    /// Specifies the maximum number of entries to keep.
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Oldest timestamp that is still too old to keep, relative to `now`.
    /// A zero age means no age limit.
    fn cutoff(&self, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let max_age = self.max_age.filter(|age| !age.is_zero())?;
        let max_age = TimeDelta::from_std(max_age).ok()?;
        now.checked_sub_signed(max_age)
    }

    /// Filter `store` ahead of merging one new entry.
    pub fn apply(&self, mut store: LogStore, now: DateTime<FixedOffset>) -> LogStore {
        let before = store.len();
        let reserve = self.min_count.saturating_sub(1);

        if store.len() >= self.min_count {
            if let Some(cutoff) = self.cutoff(now) {
                let young = store
                    .entries()
                    .iter()
                    .filter(|entry| *entry.key.timestamp() > cutoff)
                    .count();
                if young < reserve {
                    store.truncate(reserve);
                } else {
                    store.retain(|entry| *entry.key.timestamp() > cutoff);
                }
            }
        }

        if let Some(max_count) = self.max_count {
            if store.len() >= max_count {
                store.truncate(max_count.saturating_sub(1));
            }
        }

        debug!(
            before,
            after = store.len(),
            min_count = self.min_count,
            max_count = ?self.max_count,
            max_age_secs = ?self.max_age.map(|age| age.as_secs()),
            "retention"
        );
        store
    }
}
