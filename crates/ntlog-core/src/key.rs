//! Log entry keys: a timestamp plus an optional free-text description
//!
//! On disk a key reads `description ― timestamp`, or just `timestamp` when there
//! is no description. Timestamps are ISO 8601 with a numeric UTC offset.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SubsecRound, TimeZone};
use thiserror::Error;

/// Separator between description and timestamp (U+2015 HORIZONTAL BAR)
pub const KEY_SEPARATOR: char = '―';

/// Stand-in for the separator when it shows up inside a description (U+2014 EM DASH)
pub const SEPARATOR_REPLACEMENT: char = '—';

/// Offset-bearing formats accepted besides RFC 3339
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Local-time formats, interpreted in the current time zone
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A key whose timestamp segment is not a recognized date/time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected an ISO 8601-like timestamp, but was given '{raw}'")]
pub struct KeyError {
    /// The offending text
    pub raw: String,
}

/// Composite key of a log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogKey {
    timestamp: DateTime<FixedOffset>,
    description: Option<String>,
}

impl LogKey {
    /// Build a key, truncating the timestamp to the microsecond precision the
    /// on-disk form carries. Blank descriptions are dropped.
    pub fn new(timestamp: DateTime<FixedOffset>, description: Option<String>) -> Self {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            timestamp: timestamp.trunc_subsecs(6),
            description,
        }
    }

    /// Key with no description
    pub fn at(timestamp: DateTime<FixedOffset>) -> Self {
        Self::new(timestamp, None)
    }

    pub fn timestamp(&self) -> &DateTime<FixedOffset> {
        &self.timestamp
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Decode an on-disk key.
    pub fn decode(raw: &str) -> Result<Self, KeyError> {
        let malformed = || KeyError {
            raw: raw.to_string(),
        };

        let parts: Vec<&str> = raw.split(KEY_SEPARATOR).map(str::trim).collect();
        let (description, stamp) = match parts.as_slice() {
            [stamp] => (None, *stamp),
            [description, stamp] => (Some(description.to_string()), *stamp),
            _ => return Err(malformed()),
        };

        let timestamp = parse_timestamp(stamp).ok_or_else(|| KeyError {
            raw: stamp.to_string(),
        })?;
        Ok(Self::new(timestamp, description))
    }

    /// Encode to the on-disk form.
    pub fn encode(&self) -> String {
        let stamp = format_timestamp(&self.timestamp);
        match &self.description {
            Some(description) => {
                let description =
                    description.replace(KEY_SEPARATOR, &SEPARATOR_REPLACEMENT.to_string());
                format!("{description} {KEY_SEPARATOR} {stamp}")
            }
            None => stamp,
        }
    }
}

impl Ord for LogKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.description.cmp(&other.description))
    }
}

impl PartialOrd for LogKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for LogKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Render a timestamp as ISO 8601 with offset; sub-seconds only when present.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    if timestamp.timestamp_subsec_nanos() == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
    }
}

/// Parse the timestamp formats ntlog understands.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    if let Some(ts) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    {
        return Some(ts);
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return local_from_naive(naive);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(local_from_naive)
}

fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.fixed_offset())
}
