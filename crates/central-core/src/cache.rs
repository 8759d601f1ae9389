//! File-content cache keyed by path and modification stamp.
//!
//! Configuration sources (properties files, git config) are re-read on every
//! resolution pass. The cache returns the previous content only while the
//! file's modification time and length are unchanged; any change in either
//! forces a re-read. A missing file is never cached.
//!
//! A file modified within [`RACY_WINDOW`] of when it was cached is always
//! re-read: on filesystems with coarse timestamps a same-length rewrite in
//! that window keeps the old stamp.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// Modification times closer than this to the read time are not trusted.
pub const RACY_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl Stamp {
    fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct Entry {
    stamp: Stamp,
    content: Arc<str>,
    read_at: SystemTime,
}

impl Entry {
    /// The stamp still identifies the cached content.
    fn is_current(&self, stamp: Stamp) -> bool {
        if self.stamp != stamp {
            return false;
        }
        match stamp.modified {
            Some(modified) => self
                .read_at
                .duration_since(modified)
                .is_ok_and(|age| age >= RACY_WINDOW),
            None => false,
        }
    }
}

/// Thread-safe cache of file contents.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: Mutex<HashMap<PathBuf, Entry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the file's content, re-reading it if the file changed since it
    /// was cached. Missing or unreadable files yield `None` and evict any
    /// previous entry.
    pub fn read(&self, path: &Path) -> Option<Arc<str>> {
        let Some(stamp) = Stamp::of(path) else {
            self.lock().remove(path);
            return None;
        };

        if let Some(entry) = self.lock().get(path) {
            if entry.is_current(stamp) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.content));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let read_at = SystemTime::now();
        let content: Arc<str> = match std::fs::read_to_string(path) {
            Ok(text) => Arc::from(text),
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                self.lock().remove(path);
                return None;
            }
        };
        tracing::debug!("Cached {}", path.display());
        self.lock().insert(
            path.to_path_buf(),
            Entry {
                stamp,
                content: Arc::clone(&content),
                read_at,
            },
        );
        Some(content)
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of reads served from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of reads that went to disk.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}
