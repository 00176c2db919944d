//! Command dispatch logic for ntlog

use std::time::Instant;

use tracing::debug;

use crate::cli::Cli;
use crate::commands::merge;
use ntlog_core::config::GlobalConfig;
use ntlog_core::error::Result;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = GlobalConfig::load()?;
    debug!(
        elapsed = ?start.elapsed(),
        source = %GlobalConfig::source_display(),
        "load_config"
    );

    merge::execute(cli, &config, start)
}
