//! Merge the given log file into its NestedText store
//!
//! - Options are validated before any file is touched
//! - The new entry's timestamp is the log file's modification time unless
//!   `--ctime` is given
//! - With `--delete`, the log file is removed once the store is written

mod options;

use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, info};

use crate::cli::{Cli, OutputFormat};
use ntlog_core::config::GlobalConfig;
use ntlog_core::error::{NtlogError, Result};
use ntlog_core::session::{MergeSummary, NtlogSession};
use ntlog_core::store::paths::store_path_for;

pub use options::resolve_options;

/// Modification time of `path` in local time
fn modification_time(path: &Path) -> Result<DateTime<FixedOffset>> {
    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|e| NtlogError::file_access(path, e))?;
    Ok(DateTime::<Local>::from(modified).fixed_offset())
}

/// Execute the merge command
pub fn execute(cli: &Cli, config: &GlobalConfig, start: Instant) -> Result<()> {
    let mut options = resolve_options(cli, config)?;
    debug!(elapsed = ?start.elapsed(), ?options, "resolve_options");

    let input = cli.logfile.as_path();
    if options.ctime.is_none() {
        options.ctime = Some(modification_time(input)?);
    }
    let text = fs::read_to_string(input).map_err(|e| NtlogError::file_access(input, e))?;

    let store_path = store_path_for(input);
    let mut session = NtlogSession::open(&store_path, options)?;
    debug!(
        elapsed = ?start.elapsed(),
        existing = session.existing().len(),
        "open_store"
    );

    session.write_str(&text)?;
    let summary = session.close()?;
    debug!(elapsed = ?start.elapsed(), "close_store");

    if cli.delete {
        fs::remove_file(input).map_err(|e| NtlogError::file_access(input, e))?;
        debug!(path = %input.display(), "deleted_source");
    }

    report(cli, &summary)
}

fn report(cli: &Cli, summary: &MergeSummary) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Human => {
            info!(
                store = %summary.store.display(),
                key = %summary.key,
                entries = summary.entries,
                dropped = summary.dropped,
                already_present = summary.already_present,
                "merged"
            );
        }
    }
    Ok(())
}
