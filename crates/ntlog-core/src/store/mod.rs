//! Reading and writing NestedText log stores
//!
//! A missing store file reads as an empty store. Writes go to a sibling temp
//! file that is renamed over the store, so readers never see a partial file.

pub mod paths;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::entry::{LogEntry, LogStore};
use crate::error::{NtlogError, Result};
use crate::key::LogKey;
use crate::nestedtext;
use crate::trace_time;

/// Load and decode the store at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<LogStore> {
    let start = Instant::now();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("store does not exist yet, starting empty");
            return Ok(LogStore::new());
        }
        Err(e) => return Err(NtlogError::file_access(path, e)),
    };

    let items = nestedtext::loads(&text).map_err(|e| NtlogError::StoreFormat {
        path: path.to_path_buf(),
        line: e.line,
        column: e.column,
        message: e.message,
    })?;

    let entries = items
        .into_iter()
        .map(|(raw, text)| {
            LogKey::decode(&raw)
                .map(|key| LogEntry::new(key, text))
                .map_err(|e| NtlogError::malformed_key(path, e.raw))
        })
        .collect::<Result<Vec<_>>>()?;

    let store = LogStore::from_entries(entries)?;
    trace_time!(start, "load_store", entries = store.len());
    Ok(store)
}

fn write_synced(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Atomically replace the file at `path` with `contents`.
#[tracing::instrument(skip(path, contents), fields(path = %path.display(), bytes = contents.len()))]
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = paths::temp_path(path);

    if let Err(e) = write_synced(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(NtlogError::file_access(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(NtlogError::file_access(path, e));
    }
    Ok(())
}
