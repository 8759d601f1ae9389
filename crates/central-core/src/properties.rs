//! `gradle.properties`-style key/value files.
//!
//! Format: one `KEY=value` (or `KEY: value`) per line, `#` or `!`
//! comments, blank lines ignored. A trailing backslash continues the
//! value on the next line and `\n`, `\t`, `\\`, `\=`, `\:` escapes are
//! decoded, so ASCII-armored signing keys can be stored on a single line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use central_util::errors::CentralError;

/// File name of both the project-local and the user-level properties file.
pub const PROPERTIES_FILE: &str = "gradle.properties";

/// Parse properties text. Lines without a `=` or `:` separator are skipped.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let mut pending: Option<String> = None;

    for raw in content.lines() {
        let line = match pending.take() {
            Some(mut acc) => {
                acc.push_str(raw.trim_start());
                acc
            }
            None => {
                let trimmed = raw.trim_start();
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        if ends_with_continuation(&line) {
            let mut acc = line;
            acc.pop();
            pending = Some(acc);
            continue;
        }
        insert_line(&mut map, &line);
    }
    if let Some(rest) = pending {
        insert_line(&mut map, &rest);
    }
    map
}

fn insert_line(map: &mut BTreeMap<String, String>, line: &str) {
    if let Some((key, value)) = split_entry(line) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        map.insert(unescape(key), unescape(value.trim()));
    }
}

/// Split at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('!')
}

/// An odd number of trailing backslashes means the line continues.
fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Load a properties file. A missing or unreadable file contributes nothing.
pub fn load_properties(path: &Path) -> BTreeMap<String, String> {
    match central_util::fs::read_optional(path) {
        Some(content) => parse_properties(&content),
        None => BTreeMap::new(),
    }
}

/// Set `entries` in the properties file at `path`, replacing existing keys in
/// place and appending new ones. A replaced entry loses all of its
/// continuation lines. Comments and unrelated entries are kept verbatim.
pub fn upsert_properties(path: &Path, entries: &[(&str, &str)]) -> miette::Result<()> {
    let existing = central_util::fs::read_optional(path).unwrap_or_default();
    let mut remaining: Vec<(&str, &str)> = entries.to_vec();
    let mut lines: Vec<String> = Vec::new();

    let mut physical = existing.lines();
    while let Some(line) = physical.next() {
        if line.trim().is_empty() || is_comment(line) {
            lines.push(line.to_string());
            continue;
        }

        let mut entry = vec![line];
        while entry.last().is_some_and(|l| ends_with_continuation(l)) {
            match physical.next() {
                Some(next) => entry.push(next),
                None => break,
            }
        }

        let key = split_entry(line.trim_start()).map(|(k, _)| unescape(k.trim()));
        match key.and_then(|key| remaining.iter().position(|(k, _)| *k == key)) {
            Some(pos) => {
                let (k, v) = remaining.remove(pos);
                lines.push(format!("{k}={}", escape(v)));
            }
            None => lines.extend(entry.iter().map(|l| l.to_string())),
        }
    }
    for (k, v) in remaining {
        lines.push(format!("{k}={}", escape(v)));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(CentralError::Io)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).map_err(|e| CentralError::Config {
        message: format!("Failed to write {}: {e}", path.display()),
    })?;
    Ok(())
}

/// Path of the user-level properties file: `$GRADLE_USER_HOME/gradle.properties`
/// when `gradle_user_home` is set, otherwise `~/.gradle/gradle.properties`.
pub fn global_properties_path(
    gradle_user_home: Option<&str>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    match gradle_user_home.filter(|h| !h.trim().is_empty()) {
        Some(dir) => Some(PathBuf::from(dir).join(PROPERTIES_FILE)),
        None => home.map(|h| h.join(".gradle").join(PROPERTIES_FILE)),
    }
}
