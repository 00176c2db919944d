//! Store path derivation

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension given to the accumulated log
pub const STORE_EXTENSION: &str = "log.nt";

/// Suffix of the scratch file used for atomic writes
const TEMP_SUFFIX: &str = ".tmp";

/// Store path for an input log: the extension is replaced by `.log.nt`.
///
/// ```
/// use std::path::Path;
/// use ntlog_core::store::paths::store_path_for;
///
/// assert_eq!(store_path_for(Path::new("app.log")), Path::new("app.log.nt"));
/// assert_eq!(store_path_for(Path::new("dir/run.txt")), Path::new("dir/run.log.nt"));
/// ```
pub fn store_path_for(input: &Path) -> PathBuf {
    input.with_extension(STORE_EXTENSION)
}

/// Sibling scratch path for `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("store"));
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}
