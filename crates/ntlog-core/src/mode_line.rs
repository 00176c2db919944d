//! Editor mode lines appended to the end of a store

use std::fmt;
use std::str::FromStr;

use crate::error::NtlogError;

/// Editors ntlog knows how to write a mode line for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    Vim,
    Emacs,
}

impl Editor {
    pub const ALL: &'static [Editor] = &[Editor::Vim, Editor::Emacs];

    pub fn name(&self) -> &'static str {
        match self {
            Editor::Vim => "vim",
            Editor::Emacs => "emacs",
        }
    }

    /// Comma-separated list of valid names, for help and error text
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(Editor::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Mode line text, before it is turned into a comment
    pub fn mode_line(&self) -> &'static str {
        match self {
            Editor::Vim => "vim: set ft=nestedtext fdm=marker:",
            Editor::Emacs => "Local Variables:\nmode: nestedtext\nEnd:",
        }
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Editor {
    type Err = NtlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|editor| editor.name() == wanted)
            .ok_or_else(|| {
                NtlogError::invalid_option(
                    s,
                    format!("unknown editor, choose from: {}", Self::choices()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor() {
        assert_eq!("vim".parse::<Editor>().unwrap(), Editor::Vim);
        assert_eq!("Emacs".parse::<Editor>().unwrap(), Editor::Emacs);
    }

    #[test]
    fn test_unknown_editor_lists_choices() {
        let err = "notepad".parse::<Editor>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "notepad: unknown editor, choose from: vim, emacs"
        );
    }
}
