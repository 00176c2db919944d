//! CLI commands for ntlog

pub mod dispatch;
pub mod merge;
