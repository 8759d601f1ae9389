//! Plain-text helpers for Gradle build and settings scripts.
//!
//! Scripts are never parsed as code; detection works on comment-stripped
//! text with regular expressions.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

pub(crate) const SETTINGS_FILES: &[&str] = &["settings.gradle.kts", "settings.gradle"];
pub(crate) const BUILD_FILES: &[&str] = &["build.gradle.kts", "build.gradle"];

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^((?:[^"'/\n]|"[^"\n]*"|'[^'\n]*'|/[^/\n])*)//.*$"#).expect("valid regex"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"'\n]+)["']"#).expect("valid regex"));

/// Remove `/* */` and `//` comments. `//` inside a quoted string is kept.
pub(crate) fn strip_comments(script: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(script, "");
    LINE_COMMENT.replace_all(&without_blocks, "$1").into_owned()
}

/// All single- or double-quoted strings in `text`, in order.
pub(crate) fn quoted_strings(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// First settings file in `dir`, if any.
pub(crate) fn settings_file(dir: &Path) -> Option<PathBuf> {
    central_util::fs::first_existing(dir, SETTINGS_FILES)
}

/// First build file in `dir`, if any.
pub(crate) fn build_file(dir: &Path) -> Option<PathBuf> {
    central_util::fs::first_existing(dir, BUILD_FILES)
}

/// Read a script and strip its comments. Unreadable files yield `None`.
pub(crate) fn read_script(path: &Path) -> Option<String> {
    central_util::fs::read_optional(path).map(|s| strip_comments(&s))
}

/// File name for use as a provenance label.
pub(crate) fn label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
