use clap::Args;
use ntlog_core::header::HeaderConfig;

/// Retention limits. Values are validated after parsing so that bad input is
/// reported as a single `ntlog error:` line.
#[derive(Args, Debug, Clone, Default)]
pub struct RetentionArgs {
    /// Drop entries older than this (e.g. 7, 36h, 2w; unit-less means days) [default: 7]
    #[arg(long, short = 'k', value_name = "DURATION", env = "NTLOG_KEEP_FOR")]
    pub keep_for: Option<String>,

    /// Maximum number of log entries to keep
    #[arg(long, short = 'n', value_name = "N", env = "NTLOG_MAX_ENTRIES")]
    pub max_entries: Option<String>,

    /// Minimum number of log entries to keep [default: 1]
    #[arg(long, short = 'N', value_name = "N", env = "NTLOG_MIN_ENTRIES")]
    pub min_entries: Option<String>,
}

/// Header templates (chrono strftime syntax)
#[derive(Args, Debug, Clone, Default)]
pub struct HeaderArgs {
    /// Add year headers
    #[arg(long, short = 'Y', value_name = "FMT")]
    pub year: Option<String>,

    /// Add month headers
    #[arg(long, short = 'M', value_name = "FMT")]
    pub month: Option<String>,

    /// Add day headers
    #[arg(long, short = 'D', value_name = "FMT")]
    pub day: Option<String>,

    /// Add hour headers
    #[arg(long, short = 'H', value_name = "FMT")]
    pub hour: Option<String>,

    /// Add entry headers
    #[arg(long, short = 'E', value_name = "FMT")]
    pub entry: Option<String>,
}

impl From<HeaderArgs> for HeaderConfig {
    fn from(args: HeaderArgs) -> Self {
        HeaderConfig {
            year: args.year,
            month: args.month,
            day: args.day,
            hour: args.hour,
            entry: args.entry,
        }
    }
}
