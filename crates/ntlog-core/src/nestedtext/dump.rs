/// Indentation used for value blocks
pub const INDENT: &str = "    ";

/// Characters that cannot start an inline key
const RESERVED_LEADERS: &[char] = &['-', '>', ':', '#', '[', '{'];

fn is_inline_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(['\n', '\r'])
        && key.trim() == key
        && !key.starts_with(RESERVED_LEADERS)
        && !key.contains(": ")
        && !key.ends_with(':')
}

fn is_inline_value(value: &str) -> bool {
    !value.is_empty() && !value.contains(['\n', '\r']) && value.trim() == value
}

fn push_block(out: &mut Vec<String>, value: &str) {
    for line in value.split('\n') {
        if line.is_empty() {
            out.push(format!("{INDENT}>"));
        } else {
            out.push(format!("{INDENT}> {line}"));
        }
    }
}

/// Render one `key → value` dictionary item, without a trailing newline.
///
/// Values are written verbatim; a value that cannot sit on the key line goes
/// into an indented `> ` block so that loading it back yields identical text.
pub fn dump_item(key: &str, value: &str) -> String {
    let mut out = Vec::new();
    if is_inline_key(key) {
        if value.is_empty() {
            out.push(format!("{key}:"));
        } else if is_inline_value(value) {
            out.push(format!("{key}: {value}"));
        } else {
            out.push(format!("{key}:"));
            push_block(&mut out, value);
        }
    } else {
        for line in key.split('\n') {
            if line.is_empty() {
                out.push(":".to_string());
            } else {
                out.push(format!(": {line}"));
            }
        }
        push_block(&mut out, value);
    }
    out.join("\n")
}

/// Render text as comment lines. Lines that already start with `#` (after any
/// leading whitespace) are kept as they are.
pub fn comment(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                line.to_string()
            } else if line.is_empty() {
                "#".to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
