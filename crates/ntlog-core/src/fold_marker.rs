//! Fold-marker remapping of incoming log text

use std::str::FromStr;

use crate::error::NtlogError;

/// Replace every occurrence of `from` with `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldMarkerMapping {
    pub from: String,
    pub to: String,
}

impl FoldMarkerMapping {
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.from, &self.to)
    }
}

impl FromStr for FoldMarkerMapping {
    type Err = NtlogError;

    /// Parse `"FROM TO"`: exactly two whitespace-separated tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_whitespace().collect::<Vec<_>>().as_slice() {
            [from, to] => Ok(Self {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(NtlogError::invalid_option(
                "--fold-marker",
                "value must consist of two space separated tokens",
            )),
        }
    }
}
