//! Line-based SQL statement splitting.
//!
//! A statement ends on the first line whose trimmed text ends with `;`.
//! Blank lines and `--` comment lines are dropped wherever they appear.
//! There is no lexical awareness: a `;` closing a line inside a string
//! literal or a `/* */` block still ends the statement.
//!
//! Lines break on `\n`, `\r`, `\r\n`, `\x0b`, `\x0c`, `\x1c`..`\x1e`, `\u{85}`,
//! `\u{2028}` and `\u{2029}`.

use std::iter::FusedIterator;
use std::str::Split;

const SKIPPED_PREFIXES: [&str; 2] = ["create database", "use "];

/// Lazily yields statements from `sql` in file order.
pub fn split_statements(sql: &str) -> Statements<'_> {
    Statements {
        lines: sql.split(is_line_break as fn(char) -> bool),
        parts: Vec::new(),
    }
}

pub struct Statements<'a> {
    lines: Split<'a, fn(char) -> bool>,
    parts: Vec<&'a str>,
}

impl<'a> Iterator for Statements<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        for raw_line in self.lines.by_ref() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }

            self.parts.push(line);
            if line.ends_with(';') {
                let statement = self.parts.join(" ");
                self.parts.clear();
                return Some(statement);
            }
        }

        // trailing fragment without a terminator
        if self.parts.is_empty() {
            None
        } else {
            let statement = self.parts.join(" ");
            self.parts.clear();
            Some(statement)
        }
    }
}

impl FusedIterator for Statements<'_> {}

// `\r\n` produces an empty piece in between, which the splitter drops like
// any blank line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Returns true when `statement` holds at most one SQL statement.
///
/// A `;` followed by more text outside quotes and `/* */` comments means a
/// second statement. A trailing `;` is allowed.
pub fn is_single_statement(statement: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut in_block_comment = false;
    let mut terminated = false;
    let mut chars = statement.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }

        if let Some(open) = quote {
            if ch == '\\' && open != '`' {
                chars.next();
            } else if ch == open {
                quote = None;
            }
            continue;
        }

        if terminated && !ch.is_whitespace() {
            return false;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            ';' => terminated = true,
            _ => {}
        }
    }

    true
}

/// Returns the statement to execute, or `None` when it must be skipped.
///
/// `CREATE DATABASE` and `USE` statements are skipped since the connection
/// already targets the configured database. Every `placeholder` occurrence is
/// replaced with `database` and one trailing `;` is removed.
pub fn prepare_statement(statement: &str, placeholder: &str, database: &str) -> Option<String> {
    let clean = statement.trim();
    if is_skipped(clean) {
        return None;
    }

    let mut prepared = if placeholder.is_empty() {
        clean.to_string()
    } else {
        clean.replace(placeholder, database)
    };
    if prepared.ends_with(';') {
        prepared.pop();
    }

    Some(prepared)
}

fn is_skipped(statement: &str) -> bool {
    let lowered = statement.to_lowercase();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}
