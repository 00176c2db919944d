//! Configuration for ntlog
//!
//! Defaults can be kept in `~/.config/ntlog/config.toml`; command-line flags
//! override anything set there.

pub mod global;

pub use global::{GlobalConfig, HeadersSection, CONFIG_DIR_ENV_VAR};

/// Default `--keep-for` value (days)
pub const DEFAULT_KEEP_FOR: &str = "7";
