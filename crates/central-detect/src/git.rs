//! Git detection: repository URL, SCM connections and developer identity.
//!
//! The repository's own `config` file is read directly (INI-style
//! `[section "subsection"]` / `key = value`). Only `[remote "..."]` and
//! `[user]` sections are consumed. When the repository config has no
//! identity, `git config --global` is asked instead, except for projects
//! that look like test or scratch checkouts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use central_core::cache::FileCache;
use central_util::process::CommandBuilder;

use crate::{Confidence, DetectionResult, Detector};

const GIT_CONFIG_SOURCE: &str = ".git/config";
const GLOBAL_GIT_SOURCE: &str = "git config --global";

/// Path fragments that mark sandbox checkouts where the global identity
/// must not leak into detection.
const SANDBOX_MARKERS: &[&str] = &["tmp", "temp", "test", "junit", "gradle"];

/// One `[section "subsection"]` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSection {
    /// Lower-cased section name.
    pub name: String,
    /// Subsection, case preserved.
    pub subsection: Option<String>,
    /// `(lower-cased key, value)` pairs in file order.
    pub entries: Vec<(String, String)>,
}

/// A parsed git config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfigFile {
    pub sections: Vec<GitSection>,
}

impl GitConfigFile {
    /// Last value of `key` in matching sections (git's last-one-wins rule).
    pub fn get(&self, section: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        let key = key.to_ascii_lowercase();
        self.sections
            .iter()
            .filter(|s| s.name == section && s.subsection.as_deref() == subsection)
            .flat_map(|s| s.entries.iter())
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .last()
    }

    /// `(remote name, url)` for every remote with a url, in file order.
    pub fn remotes(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = Vec::new();
        for section in self.sections.iter().filter(|s| s.name == "remote") {
            let Some(name) = section.subsection.as_deref() else {
                continue;
            };
            if out.iter().any(|(n, _)| *n == name) {
                continue;
            }
            if let Some(url) = self.get("remote", Some(name), "url") {
                out.push((name, url));
            }
        }
        out
    }

    /// URL of `origin`, falling back to the first remote declared.
    pub fn remote_url(&self) -> Option<&str> {
        self.get("remote", Some("origin"), "url")
            .or_else(|| self.remotes().first().map(|(_, url)| *url))
    }

    pub fn user_name(&self) -> Option<&str> {
        self.get("user", None, "name").filter(|v| !v.is_empty())
    }

    pub fn user_email(&self) -> Option<&str> {
        self.get("user", None, "email").filter(|v| !v.is_empty())
    }
}

/// Parse git config text. Malformed lines are skipped.
pub fn parse_git_config(content: &str) -> GitConfigFile {
    let mut file = GitConfigFile::default();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            match parse_section_header(line) {
                Some(section) => file.sections.push(section),
                None => tracing::debug!("Skipping malformed git config header: {line}"),
            }
            continue;
        }

        let Some(section) = file.sections.last_mut() else {
            continue;
        };
        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), parse_value(v)),
            // A bare key is a boolean `true`.
            None => (line, "true".to_string()),
        };
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            continue;
        }
        section.entries.push((key.to_ascii_lowercase(), value));
    }
    file
}

fn parse_section_header(line: &str) -> Option<GitSection> {
    let end = line.find(']')?;
    let inner = line[1..end].trim();
    if inner.is_empty() {
        return None;
    }

    let (name, subsection) = match inner.find('"') {
        Some(quote) => {
            let name = inner[..quote].trim();
            let rest = &inner[quote + 1..];
            let close = rest.rfind('"')?;
            let sub = rest[..close].replace("\\\"", "\"").replace("\\\\", "\\");
            (name.to_string(), Some(sub))
        }
        // Deprecated `[section.subsection]` form.
        None => match inner.split_once('.') {
            Some((name, sub)) => (name.to_string(), Some(sub.to_string())),
            None => (inner.to_string(), None),
        },
    };
    Some(GitSection {
        name: name.to_ascii_lowercase(),
        subsection,
        entries: Vec::new(),
    })
}

/// Strip inline comments and quotes from a raw value.
fn parse_value(raw: &str) -> String {
    let mut out = String::new();
    let mut in_quotes = false;
    let mut chars = raw.trim().chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            },
            '#' | ';' if !in_quotes => break,
            other => out.push(other),
        }
    }
    out.trim().to_string()
}

/// Canonical forms of a repository remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrls {
    pub host: String,
    /// `owner/repo` style path without `.git`.
    pub path: String,
    /// `https://<host>/<path>`
    pub project_url: String,
    /// `scm:git:https://<host>/<path>.git`
    pub connection: String,
    /// `scm:git:ssh://git@<host>/<path>.git`
    pub developer_connection: String,
}

/// Normalize SSH, scp-like and HTTP(S) remote URLs to canonical HTTPS and
/// `scm:git:` forms. Credentials embedded in the URL are dropped. Local
/// paths and `file://` URLs yield `None`.
pub fn normalize_remote_url(url: &str) -> Option<RepositoryUrls> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return None;
    }

    let (host, path) = if let Some((scheme, rest)) = url.split_once("://") {
        let scheme = scheme.to_ascii_lowercase();
        if !matches!(
            scheme.as_str(),
            "https" | "http" | "ssh" | "git" | "git+ssh" | "ssh+git"
        ) {
            return None;
        }
        let (authority, path) = rest.split_once('/')?;
        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = if scheme.starts_with("http") {
            host
        } else {
            // ssh ports are meaningless for the https form.
            host.split(':').next().unwrap_or(host)
        };
        (host.to_string(), path.to_string())
    } else {
        // scp-like `[user@]host:path`
        let (authority, path) = url.split_once(':')?;
        // A one-letter authority is a Windows drive, not a host.
        if authority.len() < 2 || authority.contains('/') || path.starts_with("//") {
            return None;
        }
        let host = authority.rsplit('@').next().unwrap_or(authority);
        (host.to_string(), path.to_string())
    };

    let host = host.to_ascii_lowercase();
    let path = path.trim_start_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path).trim_end_matches('/');
    if host.is_empty() || path.is_empty() {
        return None;
    }

    let project_url = format!("https://{host}/{path}");
    Some(RepositoryUrls {
        connection: format!("scm:git:{project_url}.git"),
        developer_connection: format!("scm:git:ssh://git@{host}/{path}.git"),
        host,
        path: path.to_string(),
        project_url,
    })
}

/// Locate the git directory for `start`, following `.git` files that point
/// elsewhere (`gitdir: ...`, used by worktrees and submodules).
pub fn locate_git_dir(start: &Path) -> Option<PathBuf> {
    let entry = central_util::fs::find_ancestor_entry(start, ".git")?;
    if entry.is_dir() {
        return Some(entry);
    }
    let content = std::fs::read_to_string(&entry).ok()?;
    let target = content
        .lines()
        .find_map(|l| l.trim().strip_prefix("gitdir:"))?
        .trim();
    let base = entry.parent()?;
    let dir = base.join(target);
    dir.is_dir().then_some(dir)
}

/// Path of the config file for a git directory. Linked worktrees keep
/// their config in the common directory.
pub fn config_path(git_dir: &Path) -> PathBuf {
    let common = git_dir.join("commondir");
    if let Ok(rel) = std::fs::read_to_string(&common) {
        let rel = rel.trim();
        if !rel.is_empty() {
            return git_dir.join(rel).join("config");
        }
    }
    git_dir.join("config")
}

/// Returns `true` for paths that look like test, temp or build sandboxes.
pub fn is_sandbox_path(path: &Path) -> bool {
    let text = path.to_string_lossy().to_ascii_lowercase();
    SANDBOX_MARKERS.iter().any(|m| text.contains(m))
}

/// Derive a developer id: the email's local part, else the lower-cased
/// name with whitespace replaced by `-`.
pub fn developer_id(name: &str, email: &str) -> String {
    if let Some((local, _)) = email.split_once('@') {
        if !local.trim().is_empty() {
            return local.trim().to_string();
        }
    }
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Detects repository URL, SCM block and developer identity from git.
pub struct GitDetector {
    global_fallback: bool,
    timeout: Duration,
    cache: Option<Arc<FileCache>>,
}

impl Default for GitDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GitDetector {
    pub fn new() -> Self {
        Self {
            global_fallback: true,
            timeout: Duration::from_secs(3),
            cache: None,
        }
    }

    /// Enable or disable the `git config --global` identity fallback.
    pub fn with_global_fallback(mut self, enabled: bool) -> Self {
        self.global_fallback = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: Arc<FileCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn read_config(&self, path: &Path) -> Option<String> {
        match &self.cache {
            Some(cache) => cache.read(path).map(|c| c.to_string()),
            None => central_util::fs::read_optional(path),
        }
    }

    fn global_value(&self, key: &str) -> Option<String> {
        CommandBuilder::new("git")
            .args(["config", "--global", key])
            .timeout(self.timeout)
            .stdout_line()
    }
}

impl Detector for GitDetector {
    fn name(&self) -> &'static str {
        "git"
    }

    fn detect(&self, project_root: &Path) -> Option<DetectionResult> {
        let git_dir = locate_git_dir(project_root)?;
        let mut result = DetectionResult::new();

        let config_file = config_path(&git_dir);
        let Some(content) = self.read_config(&config_file) else {
            result.warn(format!(
                "Could not read git config at {}",
                config_file.display()
            ));
            return Some(result);
        };
        let config = parse_git_config(&content);

        match config.remote_url() {
            Some(url) => match normalize_remote_url(url) {
                Some(urls) => {
                    let c = Confidence::High;
                    result.record("projectInfo.url", &urls.project_url, GIT_CONFIG_SOURCE, c);
                    result.record("projectInfo.scm.url", &urls.project_url, GIT_CONFIG_SOURCE, c);
                    result.record(
                        "projectInfo.scm.connection",
                        &urls.connection,
                        GIT_CONFIG_SOURCE,
                        c,
                    );
                    result.record(
                        "projectInfo.scm.developerConnection",
                        &urls.developer_connection,
                        GIT_CONFIG_SOURCE,
                        c,
                    );
                }
                None => result.warn(format!("Unrecognized git remote URL format: {url}")),
            },
            None => tracing::debug!("No git remote configured"),
        }

        let mut name = config.user_name().map(str::to_string);
        let mut email = config.user_email().map(str::to_string);
        let mut identity_source = (GIT_CONFIG_SOURCE, Confidence::High);

        if name.is_none() && email.is_none() && self.global_fallback {
            if is_sandbox_path(project_root) {
                tracing::debug!(
                    "Skipping global git identity for sandbox path {}",
                    project_root.display()
                );
            } else {
                name = self.global_value("user.name");
                email = self.global_value("user.email");
                identity_source = (GLOBAL_GIT_SOURCE, Confidence::Medium);
            }
        }

        if name.is_some() || email.is_some() {
            let name = name.unwrap_or_default();
            let email = email.unwrap_or_default();
            let (source, confidence) = identity_source;
            result.record(
                "projectInfo.developers[0].id",
                &developer_id(&name, &email),
                source,
                confidence,
            );
            result.record("projectInfo.developers[0].name", &name, source, confidence);
            result.record("projectInfo.developers[0].email", &email, source, confidence);
        }

        Some(result)
    }
}
