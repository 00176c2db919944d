use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the computed log filter
pub const LOG_ENV_VAR: &str = "NTLOG_LOG";

/// Helper macro for logging elapsed time at trace level.
///
/// Usage:
/// ```rust,ignore
/// let start = Instant::now();
/// // ... some work ...
/// trace_time!(start, "load_store");
/// // Or with additional fields:
/// trace_time!(start, "load_store", entries = store.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Compute the filter directive for the given CLI flags
fn level_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("ntlog={level},ntlog_core={level}"),
        (true, None) => "ntlog=debug,ntlog_core=debug".to_string(),
        (false, None) => "ntlog=warn,ntlog_core=warn".to_string(),
    }
}

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = level_directive(verbose, log_level);

    // NTLOG_LOG wins over flags so scripts can turn on tracing without editing args
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(
                        tracing_subscriber::fmt::format::FmtSpan::NEW
                            | tracing_subscriber::fmt::format::FmtSpan::CLOSE,
                    ),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(false, None), "ntlog=warn,ntlog_core=warn");
        assert_eq!(level_directive(true, None), "ntlog=debug,ntlog_core=debug");
        assert_eq!(
            level_directive(false, Some("trace")),
            "ntlog=trace,ntlog_core=trace"
        );
        assert_eq!(level_directive(true, Some("ntlog=info")), "ntlog=info");
    }
}
