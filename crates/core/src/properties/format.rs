//! Parser for the line-oriented `.properties` text format.
//!
//! Responsibilities:
//! - Split text into logical lines, honouring backslash continuations.
//! - Skip blank lines and `#`/`!` comments.
//! - Separate keys from values and resolve escape sequences.
//!
//! Does NOT handle:
//! - File I/O (see `loader::engine`).
//! - Decryption of `ENC(...)` values (see `properties::set`).
//!
//! Invariants:
//! - Parsing never fails; malformed `\u` escapes keep their raw characters.
//! - Later definitions of a key replace earlier ones.

use std::collections::HashMap;

/// Parses `.properties` text into key/value pairs, in file order.
pub fn parse(text: &str) -> Vec<(String, String)> {
    logical_lines(text)
        .into_iter()
        .map(|line| split_entry(&line))
        .collect()
}

/// Parses `.properties` text and folds it into `target`, last write wins.
pub fn load_into(text: &str, target: &mut HashMap<String, String>) {
    for (key, value) in parse(text) {
        target.insert(key, value);
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Joins continuation lines and drops comments and blanks.
///
/// Returned lines still contain their escape sequences; only the trailing
/// continuation backslash is removed.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for natural in text.split('\n') {
        let natural = natural.strip_suffix('\r').unwrap_or(natural);
        // A lone '\r' also terminates a line.
        for segment in natural.split('\r') {
            let trimmed = segment.trim_start_matches(is_blank);

            let mut line = match current.take() {
                Some(pending) => pending + trimmed,
                None => {
                    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                        continue;
                    }
                    trimmed.to_string()
                }
            };

            let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                line.pop();
                current = Some(line);
            } else if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    if let Some(line) = current.filter(|l| !l.is_empty()) {
        lines.push(line);
    }

    lines
}

fn split_entry(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut escaped = false;

    for (i, c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(*c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let mut value_start = key_end;
    while value_start < chars.len() && is_blank(chars[value_start]) {
        value_start += 1;
    }
    if value_start < chars.len() && matches!(chars[value_start], '=' | ':') {
        value_start += 1;
        while value_start < chars.len() && is_blank(chars[value_start]) {
            value_start += 1;
        }
    }

    (
        unescape(&chars[..key_end]),
        unescape(&chars[value_start.min(chars.len())..]),
    )
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' || i >= chars.len() {
            out.push(c);
            continue;
        }

        let escaped = chars[i];
        i += 1;
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let hex: String = chars[i..chars.len().min(i + 4)].iter().collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        i += 4;
                    }
                    _ => out.push('u'),
                }
            }
            other => out.push(other),
        }
    }

    out
}
