//! CLI argument parsing for ntlog
//!
//! Uses clap for argument parsing.
//! Supports global flags: --format, --quiet, --verbose, --log-level, --log-json

pub mod args;
pub mod output;
pub mod parse;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use ntlog_core::error::NtlogError;

pub use args::{HeaderArgs, RetentionArgs};
pub use output::OutputFormat;

/// NTlog - append a log file into a running NestedText log
///
/// Copies <LOGFILE> into <LOGFILE>.log.nt (the extension of <LOGFILE> is
/// replaced) while deleting any log entries that fall outside the retention
/// limits.
#[derive(Parser, Debug)]
#[command(name = "ntlog")]
#[command(author, version, about)]
pub struct Cli {
    /// Log file to incorporate
    pub logfile: PathBuf,

    #[command(flatten)]
    pub retention: RetentionArgs,

    #[command(flatten)]
    pub headers: HeaderArgs,

    /// Delete the given log file after incorporating it
    #[arg(long, short = 'd')]
    pub delete: bool,

    /// Description stored with the new log entry
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Add an editor mode line (vim or emacs)
    #[arg(long, short = 'e', value_name = "EDITOR")]
    pub editor: Option<String>,

    /// Map fold markers contained in the log file, e.g. "{{{ <<<"
    #[arg(long, value_name = "MAPPING")]
    pub fold_marker: Option<String>,

    /// Timestamp for the new entry (defaults to the log file's modification time)
    #[arg(long, value_name = "TIMESTAMP")]
    pub ctime: Option<String>,

    /// Mirror the new entry to this file while it is being written
    #[arg(long, value_name = "PATH")]
    pub temp_log: Option<PathBuf>,

    /// Keep the temp log after the merge
    #[arg(long, requires = "temp_log")]
    pub retain_temp: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress error output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (e.g. debug, trace, or a full directive)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Whether `--format json` appears in raw arguments that clap could not parse
pub fn argv_requests_json<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--format=json" => return true,
            "--format" if args.next().is_some_and(|v| v.as_ref() == "json") => return true,
            _ => {}
        }
    }
    false
}

/// Structured form of a clap failure, or `None` for help and version output.
pub fn usage_error(err: &clap::Error) -> Option<NtlogError> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        ErrorKind::ArgumentConflict if err.to_string().contains("--format") => {
            Some(NtlogError::DuplicateFormat)
        }
        _ => Some(NtlogError::UsageError(err.to_string().trim_end().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "ntlog", "-k", "3d", "-n", "10", "-N", "2", "-d", "-Y", "%Y", "-M", "%B", "-D",
            "%d", "-H", "%H", "-E", "%H:%M", "-e", "vim", "app.log",
        ])
        .unwrap();
        assert_eq!(cli.logfile, PathBuf::from("app.log"));
        assert_eq!(cli.retention.keep_for.as_deref(), Some("3d"));
        assert_eq!(cli.retention.max_entries.as_deref(), Some("10"));
        assert_eq!(cli.retention.min_entries.as_deref(), Some("2"));
        assert!(cli.delete);
        assert_eq!(cli.headers.hour.as_deref(), Some("%H"));
        assert_eq!(cli.editor.as_deref(), Some("vim"));
    }

    #[test]
    fn test_retain_temp_requires_temp_log() {
        assert!(Cli::try_parse_from(["ntlog", "--retain-temp", "app.log"]).is_err());
    }

    #[test]
    fn test_argv_requests_json() {
        assert!(argv_requests_json(["--format", "json", "app.log"]));
        assert!(argv_requests_json(["app.log", "--format=json"]));
        assert!(!argv_requests_json(["--format", "human", "json"]));
        assert!(!argv_requests_json(["--format"]));
    }

    #[test]
    fn test_usage_error_mapping() {
        let err = Cli::try_parse_from(["ntlog", "--bogus", "app.log"]).unwrap_err();
        let mapped = usage_error(&err).unwrap();
        assert_eq!(mapped.exit_code(), ntlog_core::error::ExitCode::Usage);
        assert_eq!(mapped.error_type(), "usage_error");

        let help = Cli::try_parse_from(["ntlog", "--help"]).unwrap_err();
        assert!(usage_error(&help).is_none());
    }
}
