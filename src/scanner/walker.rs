//! Directory walker built on walkdir's lazy iterator.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for streaming every regular
//! file under a root, together with the size and modification time taken
//! from a single `lstat` per entry.
//!
//! # Features
//!
//! - Lazy traversal: one directory handle open per level, nothing materialized
//! - Fixed exclusion set pruned before descent (`.git`, `node_modules`, ...)
//! - Symlinks are never followed and never yielded
//! - Unreadable directories and entries are skipped, never fatal
//! - Progress report every [`PROGRESS_INTERVAL`] indexed files
//! - Cancellation checked at every directory boundary
//!
//! # Example
//!
//! ```no_run
//! use simdupe::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"));
//! let mut walk = walker.walk().expect("root is readable");
//! for file in walk.by_ref().take(10) {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! walk.close();
//! ```

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use walkdir::{DirEntry, FilterEntry, WalkDir};

use super::{FileEntry, ScanError};
use crate::progress::{indexing_message, StatusCallback};

/// Directory names the walker never descends into.
pub const EXCLUDED_DIRS: [&str; 9] = [
    ".git",
    "node_modules",
    "__pycache__",
    "$RECYCLE.BIN",
    "System Volume Information",
    ".svn",
    ".hg",
    "venv",
    ".venv",
];

/// Number of indexed files between two progress reports.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Check whether a directory name belongs to the exclusion set.
#[must_use]
pub fn is_excluded_dir(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

type EntryFilter = fn(&DirEntry) -> bool;

/// Prune excluded directories below the root. The root itself is always kept.
fn keep_entry(entry: &DirEntry) -> bool {
    !(entry.depth() > 0 && entry.file_type().is_dir() && is_excluded_dir(entry.file_name()))
}

/// Directory walker for file discovery.
///
/// A `Walker` is a reusable description of a traversal; each call to
/// [`Walker::walk`] starts a fresh, non-restartable [`Walk`].
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Optional cancellation flag
    cancel_flag: Option<Arc<AtomicBool>>,
    /// Optional progress sink
    progress: Option<Arc<dyn StatusCallback>>,
    /// Files between progress reports
    progress_interval: usize,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("cancel_flag", &self.cancel_flag)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use simdupe::scanner::Walker;
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."));
    /// ```
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            cancel_flag: None,
            progress: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    /// Set the cancellation flag.
    ///
    /// The flag is polled whenever the traversal crosses into a new
    /// directory. Once it reads `true` the walk ends.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Set the progress callback, invoked with `"Indexing: N files"`.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn StatusCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Override the number of files between progress reports.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// The root this walker was created for.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start walking the directory tree.
    ///
    /// # Errors
    ///
    /// Fails only when the root itself is missing, not a directory, or
    /// cannot be listed. Problems below the root never surface here.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use simdupe::scanner::Walker;
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."));
    /// let count = walker.walk().map(|walk| walk.count()).unwrap_or(0);
    /// println!("Found {} files", count);
    /// ```
    pub fn walk(&self) -> Result<Walk, ScanError> {
        let root = validate_root(&self.root)?;
        log::debug!("Walking {}", root.display());

        let filter: EntryFilter = keep_entry;
        let inner = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(filter);

        Ok(Walk {
            inner: Some(inner),
            cancel_flag: self.cancel_flag.clone(),
            progress: self.progress.clone(),
            progress_interval: self.progress_interval,
            indexed: 0,
            cancelled: false,
        })
    }
}

/// Validate a scan root and make it absolute.
///
/// # Errors
///
/// Returns a [`ScanError`] when the root is missing, not a directory, or
/// cannot be listed.
pub fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let metadata = fs::metadata(root).map_err(|e| ScanError::from_io(root.to_path_buf(), e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Listing the root up front turns "exists but unreadable" into an error
    // instead of a silently empty walk.
    fs::read_dir(root).map_err(|e| ScanError::from_io(root.to_path_buf(), e))?;

    std::path::absolute(root).map_err(|e| ScanError::from_io(root.to_path_buf(), e))
}

/// A lazy, finite, non-restartable stream of regular files.
///
/// Dropping the `Walk` releases its directory handles; [`Walk::close`]
/// does the same eagerly and leaves the iterator exhausted.
pub struct Walk {
    inner: Option<FilterEntry<walkdir::IntoIter, EntryFilter>>,
    cancel_flag: Option<Arc<AtomicBool>>,
    progress: Option<Arc<dyn StatusCallback>>,
    progress_interval: usize,
    indexed: usize,
    cancelled: bool,
}

impl Walk {
    /// Release all open directory handles and end the stream.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            log::trace!("Walk closed after {} files", self.indexed);
        }
    }

    /// Number of files yielded so far.
    #[must_use]
    pub fn indexed(&self) -> usize {
        self.indexed
    }

    /// Whether the walk ended because the cancellation flag was raised.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn report_progress(&self) {
        if self.indexed % self.progress_interval == 0 {
            if let Some(ref callback) = self.progress {
                callback.on_status(&indexing_message(self.indexed));
            }
        }
    }
}

impl Iterator for Walk {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let result = self.inner.as_mut()?.next();
            let Some(result) = result else {
                self.close();
                return None;
            };

            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable directories and vanished entries are skipped
                    log::debug!(
                        "Skipping {}: {}",
                        e.path()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        e
                    );
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.is_cancel_requested() {
                    log::debug!("Walker: cancellation requested, stopping");
                    self.cancelled = true;
                    self.close();
                    return None;
                }
                continue;
            }

            // Symlinks, sockets, fifos and devices are never yielded
            if !file_type.is_file() {
                log::trace!("Skipping non-regular entry: {}", entry.path().display());
                continue;
            }

            // Not following links, so this is the single lstat for the entry
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    log::debug!("Cannot stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            self.indexed += 1;
            self.report_progress();

            return Some(FileEntry {
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                path: entry.into_path(),
            });
        }
    }
}
