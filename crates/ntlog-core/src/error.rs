//! Error types and exit codes for ntlog
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (I/O, overwrite conflicts)
//! - 2: Usage error (bad flags/args, invalid option values)
//! - 3: Data/store error (unparseable store, malformed keys)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes per ntlog conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - invalid store contents (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while merging a log into a store
#[derive(Error, Debug)]
pub enum NtlogError {
    // Usage errors (exit code 2)
    #[error("--format may only be specified once")]
    DuplicateFormat,

    #[error("{0}")]
    UsageError(String),

    #[error("{culprit}: {reason}")]
    InvalidOption { culprit: String, reason: String },

    // Data/store errors (exit code 3)
    #[error("{}, {line}:{column}: {message}", path.display())]
    StoreFormat {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{}: expected an ISO 8601-like timestamp, but was given '{key}'", path.display())]
    MalformedKey { path: PathBuf, key: String },

    // Generic failures (exit code 1)
    #[error("{key}: attempt to overwrite log entry")]
    DuplicateKeyConflict { key: String },

    #[error("{}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl NtlogError {
    /// Create an error for an option value that failed validation
    pub fn invalid_option(culprit: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        NtlogError::InvalidOption {
            culprit: culprit.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an error for a failed filesystem operation on `path`
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NtlogError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create an error for a key whose timestamp could not be parsed
    pub fn malformed_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        NtlogError::MalformedKey {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NtlogError::DuplicateFormat
            | NtlogError::UsageError(_)
            | NtlogError::InvalidOption { .. } => ExitCode::Usage,

            NtlogError::StoreFormat { .. } | NtlogError::MalformedKey { .. } => ExitCode::Data,

            NtlogError::DuplicateKeyConflict { .. }
            | NtlogError::FileAccess { .. }
            | NtlogError::Io(_)
            | NtlogError::Json(_)
            | NtlogError::Toml(_)
            | NtlogError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            NtlogError::DuplicateFormat => "duplicate_format",
            NtlogError::UsageError(_) => "usage_error",
            NtlogError::InvalidOption { .. } => "invalid_option",
            NtlogError::StoreFormat { .. } => "store_format",
            NtlogError::MalformedKey { .. } => "malformed_key",
            NtlogError::DuplicateKeyConflict { .. } => "duplicate_key_conflict",
            NtlogError::FileAccess { .. } => "file_access",
            NtlogError::Io(_) => "io_error",
            NtlogError::Json(_) => "json_error",
            NtlogError::Toml(_) => "toml_error",
            NtlogError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        // Source locations are useful to tooling that wants to jump to the bad line
        if let NtlogError::StoreFormat {
            path, line, column, ..
        } = self
        {
            error_obj["location"] = serde_json::json!({
                "path": path.display().to_string(),
                "line": line,
                "column": column,
            });
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for ntlog operations
pub type Result<T> = std::result::Result<T, NtlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            NtlogError::invalid_option("0", "expected strictly positive number").exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            NtlogError::malformed_key("a.log.nt", "not a date").exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            NtlogError::DuplicateKeyConflict {
                key: "2024-01-01T00:00:00+00:00".into()
            }
            .exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_store_format_json_has_location() {
        let err = NtlogError::StoreFormat {
            path: PathBuf::from("test.log.nt"),
            line: 1,
            column: 0,
            message: "unrecognized line".into(),
        };
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "store_format");
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["location"]["line"], 1);
        assert_eq!(err.to_string(), "test.log.nt, 1:0: unrecognized line");
    }

    #[test]
    fn test_malformed_key_message() {
        let err = NtlogError::malformed_key("test.log.nt", "not a date");
        assert_eq!(
            err.to_string(),
            "test.log.nt: expected an ISO 8601-like timestamp, but was given 'not a date'"
        );
    }
}
