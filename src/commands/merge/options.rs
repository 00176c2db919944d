//! Turn CLI flags and config defaults into session options

use ntlog_core::config::{GlobalConfig, DEFAULT_KEEP_FOR};
use ntlog_core::duration::parse_duration;
use ntlog_core::error::{NtlogError, Result};
use ntlog_core::fold_marker::FoldMarkerMapping;
use ntlog_core::header::HeaderConfig;
use ntlog_core::key::parse_timestamp;
use ntlog_core::mode_line::Editor;
use ntlog_core::retention::RetentionPolicy;
use ntlog_core::session::SessionOptions;

use crate::cli::parse::parse_count;
use crate::cli::Cli;

/// Resolve a count flag, falling back to the config value.
fn count(flag: Option<&str>, configured: Option<usize>, name: &str) -> Result<Option<usize>> {
    match (flag, configured) {
        (Some(text), _) => parse_count(text).map(Some),
        (None, Some(0)) => Err(NtlogError::invalid_option(
            name,
            "expected strictly positive number",
        )),
        (None, configured) => Ok(configured),
    }
}

fn retention_policy(cli: &Cli, config: &GlobalConfig) -> Result<RetentionPolicy> {
    let args = &cli.retention;
    let keep_for = args
        .keep_for
        .as_deref()
        .or(config.keep_for.as_deref())
        .unwrap_or(DEFAULT_KEEP_FOR);

    let mut policy = RetentionPolicy::default().with_max_age(parse_duration(keep_for)?);
    if let Some(min) = count(args.min_entries.as_deref(), config.min_entries, "min_entries")? {
        policy = policy.with_min_count(min);
    }
    if let Some(max) = count(args.max_entries.as_deref(), config.max_entries, "max_entries")? {
        policy = policy.with_max_count(max);
    }
    Ok(policy)
}

fn header_config(cli: &Cli, config: &GlobalConfig) -> HeaderConfig {
    HeaderConfig::from(cli.headers.clone()).or(HeaderConfig::from(config.headers.clone()))
}

/// Validate every option; nothing here touches the store or the log file.
pub fn resolve_options(cli: &Cli, config: &GlobalConfig) -> Result<SessionOptions> {
    let retention = retention_policy(cli, config)?;

    let headers = header_config(cli, config);
    headers.validate()?;

    let editor = cli
        .editor
        .as_deref()
        .or(config.editor.as_deref())
        .map(str::parse::<Editor>)
        .transpose()?;

    let fold_marker = cli
        .fold_marker
        .as_deref()
        .map(str::parse::<FoldMarkerMapping>)
        .transpose()?;

    let ctime = match cli.ctime.as_deref() {
        Some(text) => Some(parse_timestamp(text).ok_or_else(|| {
            NtlogError::invalid_option(text, "expected an ISO 8601-like timestamp")
        })?),
        None => None,
    };

    Ok(SessionOptions {
        retention,
        headers,
        editor,
        fold_marker,
        description: cli.description.clone(),
        ctime,
        temp_log: cli.temp_log.clone(),
        retain_temp: cli.retain_temp,
    })
}
