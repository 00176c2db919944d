use std::collections::HashSet;

use thiserror::Error;

/// Syntax error in a NestedText document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    /// 0-based column
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn new(index: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line: index + 1,
            column,
            message: message.into(),
        }
    }
}

/// One physical line after classification
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    index: usize,
    indent: usize,
    content: &'a str,
}

/// Split the document into significant lines, dropping blanks and comments and
/// rejecting tabs in indentation.
fn significant_lines(text: &str) -> Result<Vec<Line<'_>>, ParseError> {
    let mut lines = Vec::new();
    for (index, raw) in text.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let indent = raw.len() - raw.trim_start_matches(' ').len();
        let content = &raw[indent..];

        if content.trim().is_empty() || content.starts_with('#') {
            continue;
        }
        if content.starts_with('\t') {
            return Err(ParseError::new(
                index,
                indent,
                "invalid character in indentation: '\\t'",
            ));
        }
        lines.push(Line {
            index,
            indent,
            content,
        });
    }
    Ok(lines)
}

/// Text of a `> ` string line, `None` if the line is not one
fn string_line(content: &str) -> Option<&str> {
    if content == ">" {
        Some("")
    } else {
        content.strip_prefix("> ")
    }
}

/// Text of a `: ` key line, `None` if the line is not one
fn key_line(content: &str) -> Option<&str> {
    if content == ":" {
        Some("")
    } else {
        content.strip_prefix(": ")
    }
}

/// Split `key: value` / `key:` at the first colon followed by a space or the
/// end of the line.
fn split_dict_item(content: &str) -> Option<(&str, Option<&str>)> {
    let bytes = content.as_bytes();
    for (pos, _) in content.match_indices(':') {
        match bytes.get(pos + 1) {
            None => return Some((content[..pos].trim_end(), None)),
            Some(b' ') => return Some((content[..pos].trim_end(), Some(&content[pos + 2..]))),
            Some(_) => continue,
        }
    }
    None
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Read the indented string block that follows a `key:` line.
    fn read_block(&mut self) -> Result<String, ParseError> {
        let Some(first) = self.peek() else {
            return Ok(String::new());
        };
        if first.indent == 0 {
            return Ok(String::new());
        }

        let block_indent = first.indent;
        let mut parts = Vec::new();
        while let Some(line) = self.peek() {
            if line.indent == 0 {
                break;
            }
            if line.indent != block_indent {
                return Err(ParseError::new(
                    line.index,
                    line.indent,
                    "invalid indentation",
                ));
            }
            let Some(text) = string_line(line.content) else {
                let message = if split_dict_item(line.content).is_some()
                    || line.content.starts_with('-')
                {
                    "log entries must be strings, found nested data"
                } else {
                    "unrecognized line"
                };
                return Err(ParseError::new(line.index, line.indent, message));
            };
            parts.push(text);
            self.pos += 1;
        }
        Ok(parts.join("\n"))
    }

    fn reject_block(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(line) if line.indent > 0 => Err(ParseError::new(
                line.index,
                line.indent,
                "invalid indentation",
            )),
            _ => Ok(()),
        }
    }

    /// Parse one top-level item, returning its line index, key and value.
    fn item(&mut self) -> Result<Option<(usize, String, String)>, ParseError> {
        let Some(line) = self.peek() else {
            return Ok(None);
        };
        if line.indent != 0 {
            return Err(ParseError::new(
                line.index,
                line.indent,
                "invalid indentation",
            ));
        }

        let content = line.content;
        if key_line(content).is_some() {
            let mut key_parts = Vec::new();
            while let Some(next) = self.peek() {
                match key_line(next.content) {
                    Some(text) if next.indent == 0 => {
                        key_parts.push(text);
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            let value = self.read_block()?;
            return Ok(Some((line.index, key_parts.join("\n"), value)));
        }

        if string_line(content).is_some()
            || content == "-"
            || content.starts_with("- ")
            || content.starts_with('[')
            || content.starts_with('{')
        {
            return Err(ParseError::new(
                line.index,
                0,
                "expected a dictionary of log entries",
            ));
        }

        let Some((key, value)) = split_dict_item(content) else {
            return Err(ParseError::new(line.index, 0, "unrecognized line"));
        };
        self.pos += 1;

        let value = match value {
            Some(inline) => {
                self.reject_block()?;
                inline.to_string()
            }
            None => self.read_block()?,
        };
        Ok(Some((line.index, key.to_string(), value)))
    }
}

/// Parse a store document into its key/value pairs, in document order.
pub fn loads(text: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut parser = Parser {
        lines: significant_lines(text)?,
        pos: 0,
    };

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    while let Some((index, key, value)) = parser.item()? {
        if !seen.insert(key.clone()) {
            return Err(ParseError::new(index, 0, format!("duplicate key: {key}")));
        }
        items.push((key, value));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        assert!(loads("").unwrap().is_empty());
        assert!(loads("\n# only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_inline_values() {
        let items = loads("2024-01-01T00:00:00+00:00: hello world\nb: two: parts\n").unwrap();
        assert_eq!(
            items,
            vec![
                ("2024-01-01T00:00:00+00:00".to_string(), "hello world".to_string()),
                ("b".to_string(), "two: parts".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiline_value_with_blank_lines() {
        let doc = "key:\n    > first\n    >\n    > third\n";
        let items = loads(doc).unwrap();
        assert_eq!(items[0].1, "first\n\nthird");
    }

    #[test]
    fn test_comments_and_blank_lines_inside_block() {
        let doc = "key:\n    > a\n\n    # not part of the value\n    > b\nnext: c\n";
        let items = loads(doc).unwrap();
        assert_eq!(items[0].1, "a\nb");
        assert_eq!(items[1], ("next".to_string(), "c".to_string()));
    }

    #[test]
    fn test_empty_value() {
        let items = loads("key:\nother: x").unwrap();
        assert_eq!(items[0].1, "");
    }

    #[test]
    fn test_multiline_key() {
        let doc = ": first: part\n: second\n    > value\n";
        let items = loads(doc).unwrap();
        assert_eq!(items[0].0, "first: part\nsecond");
        assert_eq!(items[0].1, "value");
    }

    #[test]
    fn test_crlf_line_endings() {
        let items = loads("key:\r\n    > a\r\n    > b\r\n").unwrap();
        assert_eq!(items[0].1, "a\nb");
    }

    #[test]
    fn test_unrecognized_line() {
        let err = loads("not valid NestedText").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 0);
        assert_eq!(err.message, "unrecognized line");
    }

    #[test]
    fn test_rejects_lists() {
        let err = loads("- item\n").unwrap_err();
        assert_eq!(err.message, "expected a dictionary of log entries");
    }

    #[test]
    fn test_rejects_nested_dictionary() {
        let err = loads("key:\n    inner: value\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 4);
    }

    #[test]
    fn test_rejects_partial_dedent() {
        let err = loads("key:\n    > a\n  > b\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "invalid indentation");
    }

    #[test]
    fn test_rejects_block_after_inline_value() {
        let err = loads("key: value\n    > more\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_rejects_tab_indentation() {
        let err = loads("key:\n\t> a\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("indentation"));
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let err = loads("a: 1\na: 2\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "duplicate key: a");
    }
}
