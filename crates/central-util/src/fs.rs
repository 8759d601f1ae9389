use std::path::{Path, PathBuf};

/// Walk up from `start` looking for an entry named `name` (file or directory).
/// Returns the full path to the entry, or `None`.
pub fn find_ancestor_entry(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Returns the first of `names` that exists as a file inside `dir`.
pub fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}

/// Read a file to a string, returning `None` if it is missing or unreadable.
pub fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read {}: {e}", path.display());
            }
            None
        }
    }
}

/// Returns the current user's home directory from `HOME` or `USERPROFILE`.
pub fn user_home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
