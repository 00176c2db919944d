//! NTlog Core Library
//!
//! Merges a single log entry into an accumulating NestedText log store,
//! applying age and count based retention and optional date headers.

pub mod config;
pub mod duration;
pub mod entry;
pub mod error;
pub mod fold_marker;
pub mod format;
pub mod header;
pub mod key;
pub mod logging;
pub mod merge;
pub mod mode_line;
pub mod nestedtext;
pub mod retention;
pub mod session;
pub mod store;
