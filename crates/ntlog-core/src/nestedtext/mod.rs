//! NestedText subset used by ntlog stores
//!
//! A store is a top-level dictionary whose values are all strings:
//!
//! ```text
//! # comment
//! 2024-03-01T08:15:00+00:00: single line entry
//! nightly ― 2024-03-02T08:15:00+00:00:
//!     > first line
//!     >
//!     > third line
//! : multi-line
//! : key
//!     > value
//! ```
//!
//! Lists, nested dictionaries and inline `[`/`{` forms are rejected; they never
//! occur in a log store.

mod dump;
mod parse;

pub use dump::{comment, dump_item, INDENT};
pub use parse::{loads, ParseError};
