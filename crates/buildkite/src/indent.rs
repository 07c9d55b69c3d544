//! Indentation and quoting helpers
//!
//! Nesting depth is always an explicit `level` argument. Nothing here keeps
//! state between calls, so independent documents can be built concurrently.

use std::fmt::Write as _;

/// One nesting level
pub const INDENT_UNIT: &str = "  ";

/// An emitted document, one entry per line without trailing newlines
pub type Lines = Vec<String>;

/// Prefix `text` with `level` indentation units
///
/// Empty text stays empty so the output never carries trailing whitespace.
#[must_use]
pub fn line(level: usize, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(INDENT_UNIT.len() * level + text.len());
    for _ in 0..level {
        out.push_str(INDENT_UNIT);
    }
    out.push_str(text);
    out
}

/// Indent every line of a block by `level` units
///
/// Entries containing newlines are split and each resulting line is indented
/// on its own, so relative structure inside a multi-line entry is preserved.
#[must_use]
pub fn indent<I, S>(lines: I, level: usize) -> Lines
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|entry| {
            entry
                .as_ref()
                .split('\n')
                .map(|l| line(level, l))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Join lines into a newline-terminated document
#[must_use]
pub fn render(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a string as a YAML double-quoted scalar
///
/// Characters outside YAML's printable set are written as `\u` escapes.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || matches!(c, '\u{FFFE}' | '\u{FFFF}') => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
