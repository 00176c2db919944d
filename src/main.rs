//! NTlog - append log files into a running NestedText log
//!
//! Each run merges one log file into `<name>.log.nt`, dropping entries
//! that fall outside the retention limits.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::{Cli, OutputFormat};
use ntlog_core::error::{ExitCode as NtlogExitCode, NtlogError};
use ntlog_core::logging;

fn exit_with(code: NtlogExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// Parse arguments, emitting a JSON envelope for bad usage when JSON was asked for.
fn parse_cli() -> Result<Cli, ExitCode> {
    let err = match Cli::try_parse() {
        Ok(cli) => return Ok(cli),
        Err(err) => err,
    };

    if cli::argv_requests_json(env::args().skip(1)) {
        if let Some(usage) = cli::usage_error(&err) {
            eprintln!("{}", usage.to_json());
            return Err(exit_with(usage.exit_code()));
        }
    }
    err.exit()
}

fn report_error(cli: &Cli, err: &NtlogError) {
    match cli.format {
        OutputFormat::Json => eprintln!("{}", err.to_json()),
        OutputFormat::Human if !cli.quiet => eprintln!("ntlog error: {err}"),
        OutputFormat::Human => {}
    }
}

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(NtlogExitCode::Success),
        Err(e) => {
            report_error(&cli, &e);
            exit_with(e.exit_code())
        }
    }
}
