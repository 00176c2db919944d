//! Serialize a store with date-boundary headers
//!
//! Entries are written newest first. Before each entry the serializer emits a
//! year, month, day or hour header whenever that calendar period differs from
//! the previous entry's, then an optional per-entry header, then the entry
//! itself. Headers are always NestedText comments.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::bail_invalid;
use crate::entry::LogEntry;
use crate::error::Result;
use crate::key::KEY_SEPARATOR;
use crate::mode_line::Editor;
use crate::nestedtext;

/// `strftime` templates for the optional headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderConfig {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub hour: Option<String>,
    pub entry: Option<String>,
}

/// Calendar granularity of a boundary header, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Year,
    Month,
    Day,
    Hour,
}

impl Boundary {
    const ALL: [Boundary; 4] = [
        Boundary::Year,
        Boundary::Month,
        Boundary::Day,
        Boundary::Hour,
    ];

    /// Calendar prefix of `ts` down to this granularity
    fn period(self, ts: &DateTime<FixedOffset>) -> (i32, u32, u32, u32) {
        match self {
            Boundary::Year => (ts.year(), 0, 0, 0),
            Boundary::Month => (ts.year(), ts.month(), 0, 0),
            Boundary::Day => (ts.year(), ts.month(), ts.day(), 0),
            Boundary::Hour => (ts.year(), ts.month(), ts.day(), ts.hour()),
        }
    }
}

impl HeaderConfig {
    fn boundary_format(&self, boundary: Boundary) -> Option<&str> {
        match boundary {
            Boundary::Year => self.year.as_deref(),
            Boundary::Month => self.month.as_deref(),
            Boundary::Day => self.day.as_deref(),
            Boundary::Hour => self.hour.as_deref(),
        }
    }

    /// Check every configured template, naming the offending option.
    pub fn validate(&self) -> Result<()> {
        let formats = [
            ("--year", &self.year),
            ("--month", &self.month),
            ("--day", &self.day),
            ("--hour", &self.hour),
            ("--entry", &self.entry),
        ];
        for (option, format) in formats {
            if let Some(format) = format {
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    bail_invalid!(option, format!("invalid date format '{format}'"));
                }
            }
        }
        Ok(())
    }

    /// Fill templates missing here from `fallback`.
    pub fn or(self, fallback: HeaderConfig) -> HeaderConfig {
        HeaderConfig {
            year: self.year.or(fallback.year),
            month: self.month.or(fallback.month),
            day: self.day.or(fallback.day),
            hour: self.hour.or(fallback.hour),
            entry: self.entry.or(fallback.entry),
        }
    }
}

fn render(format: &str, ts: &DateTime<FixedOffset>) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        bail_invalid!(format, "invalid date format");
    }
    let mut out = String::new();
    if write!(out, "{}", ts.format_with_items(items.iter())).is_err() {
        bail_invalid!(format, "date format cannot be rendered");
    }
    Ok(out)
}

/// Tracks the last period a header was emitted for at each granularity
#[derive(Debug, Default)]
struct BoundaryTracker {
    last: [Option<(i32, u32, u32, u32)>; 4],
}

impl BoundaryTracker {
    /// Record `ts` at `level`; true when it starts a new period there.
    fn advance(&mut self, level: usize, ts: &DateTime<FixedOffset>) -> bool {
        let period = Boundary::ALL[level].period(ts);
        if self.last[level] == Some(period) {
            return false;
        }
        self.last[level] = Some(period);
        for finer in &mut self.last[level + 1..] {
            *finer = None;
        }
        true
    }
}

/// Render the store document for `entries`, which must be newest first.
pub fn render_document(
    entries: &[LogEntry],
    headers: &HeaderConfig,
    editor: Option<Editor>,
) -> Result<String> {
    let mut sections = Vec::new();
    let mut tracker = BoundaryTracker::default();

    for entry in entries {
        let ts = entry.key.timestamp();

        for (level, boundary) in Boundary::ALL.iter().enumerate() {
            let Some(format) = headers.boundary_format(*boundary) else {
                continue;
            };
            if tracker.advance(level, ts) {
                sections.push(nestedtext::comment(&render(format, ts)?));
            }
        }

        if let Some(format) = &headers.entry {
            let rendered = render(format, ts)?;
            let header = match entry.key.description() {
                Some(description) => format!("{description} {KEY_SEPARATOR} {rendered}"),
                None => rendered,
            };
            sections.push(nestedtext::comment(&header));
        }

        sections.push(nestedtext::dump_item(&entry.key.encode(), &entry.text));
    }

    if let Some(editor) = editor {
        sections.push(nestedtext::comment(editor.mode_line()));
    }

    if sections.is_empty() {
        return Ok(String::new());
    }
    let mut document = sections.join("\n\n");
    document.push('\n');
    Ok(document)
}
