//! Stream-style interface for building one log entry and merging it on close
//!
//! ```no_run
//! use std::io::Write;
//! use ntlog_core::session::{NtlogSession, SessionOptions};
//!
//! let mut session = NtlogSession::open("backup.log.nt", SessionOptions::default())?;
//! writeln!(session, "copied 12 files")?;
//! let summary = session.close()?;
//! println!("{} entries kept", summary.entries);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! With a temp log configured, everything written is also mirrored to that file
//! so a long-running job can be watched. The temp log is closed, and deleted
//! unless retained, whether the session closes cleanly, fails, or is dropped.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use tracing::debug;

use crate::entry::{LogEntry, LogStore};
use crate::error::{NtlogError, Result};
use crate::fold_marker::FoldMarkerMapping;
use crate::header::{render_document, HeaderConfig};
use crate::key::LogKey;
use crate::merge::{merge_entry, MergeOutcome};
use crate::mode_line::Editor;
use crate::retention::RetentionPolicy;
use crate::store;
use crate::trace_time;

/// Everything that shapes how the new entry is merged and written
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub retention: RetentionPolicy,
    pub headers: HeaderConfig,
    pub editor: Option<Editor>,
    pub fold_marker: Option<FoldMarkerMapping>,
    /// Description stored in the new entry's key
    pub description: Option<String>,
    /// Timestamp of the new entry; the time of `close` when unset
    pub ctime: Option<DateTime<FixedOffset>>,
    /// Progress file mirroring everything written
    pub temp_log: Option<PathBuf>,
    /// Keep the temp log after closing
    pub retain_temp: bool,
}

/// Outcome of closing a session
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub store: PathBuf,
    /// Encoded key of the new entry
    pub key: String,
    /// Entries in the store after the merge
    pub entries: usize,
    /// Existing entries removed by retention
    pub dropped: usize,
    /// The identical entry was already present
    pub already_present: bool,
}

/// Mirror of the in-progress entry on disk
#[derive(Debug)]
struct TempLog {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    retain: bool,
}

impl TempLog {
    fn create(path: &Path, retain: bool) -> Result<Self> {
        let file = File::create(path).map_err(|e| NtlogError::file_access(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
            retain,
        })
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(buf),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Close the file and delete it unless retained.
    fn finish(&mut self) -> io::Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush()?;
        drop(writer);
        if !self.retain {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Drop for TempLog {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(path = %self.path.display(), "failed to finalize temp log: {}", e);
        }
    }
}

/// Store values use `\n` line breaks only, so `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// An open log entry bound to a store
#[derive(Debug)]
pub struct NtlogSession {
    store_path: PathBuf,
    store: LogStore,
    options: SessionOptions,
    buffer: Vec<u8>,
    temp: Option<TempLog>,
    opened_at: DateTime<FixedOffset>,
}

impl NtlogSession {
    /// Load the store at `store_path` and start a new entry.
    ///
    /// Store and option errors surface here, before anything is written.
    #[tracing::instrument(skip(store_path, options), fields(store = %store_path.as_ref().display()))]
    pub fn open(store_path: impl AsRef<Path>, options: SessionOptions) -> Result<Self> {
        let store_path = store_path.as_ref().to_path_buf();
        options.headers.validate()?;

        let store = store::load(&store_path)?;
        debug!(entries = store.len(), "opened store");

        let temp = match &options.temp_log {
            Some(path) => Some(TempLog::create(path, options.retain_temp)?),
            None => None,
        };

        Ok(Self {
            store_path,
            store,
            options,
            buffer: Vec::new(),
            temp,
            opened_at: Local::now().fixed_offset(),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Entries loaded from the store, before retention
    pub fn existing(&self) -> &LogStore {
        &self.store
    }

    /// Append text to the new entry.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Merge the entry into the store and write it back.
    #[tracing::instrument(skip(self), fields(store = %self.store_path.display()))]
    pub fn close(mut self) -> Result<MergeSummary> {
        let start = Instant::now();

        let text = String::from_utf8(std::mem::take(&mut self.buffer))
            .map_err(|_| NtlogError::Other("log text is not valid UTF-8".to_string()))?;
        let text = normalize_newlines(text);
        let text = match &self.options.fold_marker {
            Some(mapping) => mapping.apply(&text),
            None => text,
        };

        let ctime = self
            .options
            .ctime
            .unwrap_or_else(|| Local::now().fixed_offset());
        let key = LogKey::new(ctime, self.options.description.clone());
        let encoded_key = key.encode();

        let store = std::mem::take(&mut self.store);
        let merged = merge_entry(
            store,
            LogEntry::new(key, text),
            &self.options.retention,
            self.opened_at,
        )?;
        trace_time!(start, "merge", entries = merged.store.len());

        let document = render_document(
            merged.store.entries(),
            &self.options.headers,
            self.options.editor,
        )?;
        store::write_atomic(&self.store_path, &document)?;
        trace_time!(start, "write_store", bytes = document.len());

        if let Some(mut temp) = self.temp.take() {
            temp.finish()
                .map_err(|e| NtlogError::file_access(temp.path.clone(), e))?;
        }

        Ok(MergeSummary {
            store: self.store_path.clone(),
            key: encoded_key,
            entries: merged.store.len(),
            dropped: merged.dropped,
            already_present: merged.outcome == MergeOutcome::AlreadyPresent,
        })
    }
}

impl Write for NtlogSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(temp) = self.temp.as_mut() {
            temp.write_all(buf)?;
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// Flush the temp log so its contents are visible to observers.
    fn flush(&mut self) -> io::Result<()> {
        match self.temp.as_mut() {
            Some(temp) => temp.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nestedtext;
    use std::time::Duration;
    use tempfile::tempdir;

    fn at(ts: &str) -> Option<DateTime<FixedOffset>> {
        Some(DateTime::parse_from_rfc3339(ts).unwrap())
    }

    fn run(path: &Path, options: SessionOptions, text: &str) -> Result<MergeSummary> {
        let mut session = NtlogSession::open(path, options)?;
        session.write_str(text)?;
        session.close()
    }

    #[test]
    fn test_first_entry_creates_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            ..Default::default()
        };
        let summary = run(&path, options, "Hey now!").unwrap();
        assert_eq!(summary.entries, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-05-01T10:00:00+00:00: Hey now!\n"
        );
    }

    #[test]
    fn test_identical_rerun_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            retention: RetentionPolicy::default().with_max_count(2),
            ..Default::default()
        };
        let earlier = SessionOptions {
            ctime: at("2024-04-30T10:00:00+00:00"),
            ..options.clone()
        };
        run(&path, earlier, "a").unwrap();
        run(&path, options.clone(), "b").unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let summary = run(&path, options, "b").unwrap();
        assert!(summary.already_present);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_crlf_source_reruns_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            ..Default::default()
        };
        run(&path, options.clone(), "line one\r\nline two\r\n").unwrap();
        let before = fs::read_to_string(&path).unwrap();
        assert_eq!(
            before,
            "2024-05-01T10:00:00+00:00:\n    > line one\n    > line two\n    >\n"
        );

        let summary = run(&path, options, "line one\r\nline two\r\n").unwrap();
        assert!(summary.already_present);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n".to_string()), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain\n".to_string()), "plain\n");
    }

    #[test]
    fn test_conflict_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            ..Default::default()
        };
        run(&path, options.clone(), "Hey now!").unwrap();
        let before = fs::read(&path).unwrap();

        let err = run(&path, options, "Hey there!").unwrap_err();
        assert_eq!(
            err.to_string(),
            "2024-05-01T10:00:00+00:00: attempt to overwrite log entry"
        );
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_old_entry_is_still_added() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let ctime = Local::now().fixed_offset() - chrono::TimeDelta::days(21);
        let options = SessionOptions {
            ctime: Some(ctime),
            retention: RetentionPolicy::default().with_max_age(Duration::from_secs(14 * 86_400)),
            ..Default::default()
        };
        for _ in 0..3 {
            run(&path, options.clone(), "entry written = 21 days ago.").unwrap();
            let items = nestedtext::loads(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(items.len(), 1);
        }
    }

    #[test]
    fn test_temp_log_flush_and_cleanup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let temp = dir.path().join("test.log");
        let options = SessionOptions {
            temp_log: Some(temp.clone()),
            ..Default::default()
        };

        let mut session = NtlogSession::open(&path, options).unwrap();
        write!(session, "Hey now!").unwrap();
        session.flush().unwrap();
        assert_eq!(fs::read_to_string(&temp).unwrap(), "Hey now!");
        session.close().unwrap();
        assert!(!temp.exists());
    }

    #[test]
    fn test_temp_log_retained() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let temp = dir.path().join("test.log");
        let options = SessionOptions {
            temp_log: Some(temp.clone()),
            retain_temp: true,
            ..Default::default()
        };
        run(&path, options, "kept").unwrap();
        assert_eq!(fs::read_to_string(&temp).unwrap(), "kept");
    }

    #[test]
    fn test_temp_log_removed_on_error_and_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let temp = dir.path().join("test.log");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            temp_log: Some(temp.clone()),
            ..Default::default()
        };
        run(&path, options.clone(), "first").unwrap();

        assert!(run(&path, options.clone(), "second").is_err());
        assert!(!temp.exists());

        let session = NtlogSession::open(&path, options).unwrap();
        assert!(temp.exists());
        drop(session);
        assert!(!temp.exists());
    }

    #[test]
    fn test_fold_marker_and_description() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        let options = SessionOptions {
            ctime: at("2024-05-01T10:00:00+00:00"),
            description: Some("nightly".to_string()),
            fold_marker: Some("{{{ <<<".parse().unwrap()),
            ..Default::default()
        };
        run(&path, options, "section {{{1").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "nightly ― 2024-05-01T10:00:00+00:00: section <<<1\n"
        );
    }

    #[test]
    fn test_invalid_store_fails_on_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log.nt");
        fs::write(&path, "not valid NestedText").unwrap();
        let err = NtlogSession::open(&path, SessionOptions::default()).unwrap_err();
        assert!(matches!(err, NtlogError::StoreFormat { .. }));
    }
}
