//! Scan orchestration: walk, group, report.
//!
//! # Overview
//!
//! [`Finder::scan`] drives one complete scan of a root directory:
//! 1. **Index**: stream files from the [`Walker`]
//! 2. **Analyze**: group them by the configured [`ScanMode`]
//! 3. **Ready**: report the hash backend when content hashing was used
//!
//! Only an unreadable root fails a scan. Cancellation yields an empty list.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::duplicates::{Finder, FinderConfig, ScanMode};
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_mode(ScanMode::simple(false, true, true));
//! let finder = Finder::new(config);
//!
//! let groups = finder.scan(Path::new(".")).expect("root is readable");
//! println!("Found {} groups", groups.len());
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::groups::Group;
use super::simple::{default_hash_workers, pre_bucket, Criteria, SimpleGrouper};
use super::smart::Candidates;
use crate::progress::{analyzing_message, indexing_started_message, ready_message, StatusCallback};
use crate::scanner::{HashBackend, Hasher, ScanError, Walker, PROGRESS_INTERVAL};

/// How files are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Cheap name/size criteria, optionally confirmed by content hash
    Simple(Criteria),
    /// Version and sequence pattern detection
    Smart,
}

impl Default for ScanMode {
    fn default() -> Self {
        Self::Simple(Criteria::default())
    }
}

impl ScanMode {
    /// Simple mode with normalized flags.
    #[must_use]
    pub fn simple(by_name: bool, by_size: bool, by_hash: bool) -> Self {
        Self::Simple(Criteria::new(by_name, by_size, by_hash))
    }

    /// Whether this mode reads file contents.
    #[must_use]
    pub fn uses_hash(&self) -> bool {
        matches!(self, Self::Simple(c) if c.by_hash)
    }

    /// Short label for status lines, e.g. `simple (size+hash)`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Simple(c) => format!("simple ({})", c.describe()),
            Self::Smart => "smart".to_string(),
        }
    }
}

/// Configuration for a [`Finder`].
#[derive(Clone)]
pub struct FinderConfig {
    /// Grouping strategy
    pub mode: ScanMode,
    /// Content hasher for simple mode
    pub hasher: Hasher,
    /// Hash worker threads
    pub hash_workers: usize,
    /// Files between indexing reports
    pub progress_interval: usize,
    /// Optional cancellation flag
    pub cancel_flag: Option<Arc<AtomicBool>>,
    /// Optional status sink
    pub progress_callback: Option<Arc<dyn StatusCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("mode", &self.mode)
            .field("hasher", &self.hasher)
            .field("hash_workers", &self.hash_workers)
            .field("progress_interval", &self.progress_interval)
            .field("cancel_flag", &self.cancel_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            hasher: Hasher::new(),
            hash_workers: default_hash_workers(),
            progress_interval: PROGRESS_INTERVAL,
            cancel_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the grouping strategy.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use a specific hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the number of hash worker threads.
    #[must_use]
    pub fn with_hash_workers(mut self, workers: usize) -> Self {
        self.hash_workers = workers.max(1);
        self
    }

    /// Override the number of files between indexing reports.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Set the cancellation flag.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Set the status callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn StatusCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that can escape a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root path is missing, not a directory, or unreadable.
    #[error(transparent)]
    Root(#[from] ScanError),
}

/// Runs scans with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Finder {
    config: FinderConfig,
}

impl Finder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Hash backend reported when content hashing is enabled.
    #[must_use]
    pub fn backend(&self) -> Option<HashBackend> {
        self.config
            .mode
            .uses_hash()
            .then(|| self.config.hasher.backend())
    }

    fn status(&self, message: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_status(message);
        }
    }

    /// Scan `root` and return the groups found, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Root`] when the root cannot be read. Every
    /// other failure drops the affected file. A cancelled scan returns
    /// `Ok` with an empty list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use simdupe::duplicates::{Finder, FinderConfig, ScanMode};
    /// use std::path::Path;
    ///
    /// let finder = Finder::new(FinderConfig::default().with_mode(ScanMode::Smart));
    /// match finder.scan(Path::new(".")) {
    ///     Ok(groups) => println!("{} groups", groups.len()),
    ///     Err(e) => eprintln!("Scan failed: {}", e),
    /// }
    /// ```
    pub fn scan(&self, root: &Path) -> Result<Vec<Group>, FinderError> {
        let start = Instant::now();
        log::info!(
            "Starting {} scan of {}",
            self.config.mode.label(),
            root.display()
        );

        let mut walker = Walker::new(root).with_progress_interval(self.config.progress_interval);
        if let Some(ref flag) = self.config.cancel_flag {
            walker = walker.with_cancel_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        let mut walk = walker.walk()?;
        self.status(&indexing_started_message());

        let groups = match self.config.mode {
            ScanMode::Simple(criteria) => {
                let buckets = pre_bucket(walk.by_ref(), &criteria);
                if self.finish_indexing(walk.indexed(), walk.was_cancelled()) {
                    return Ok(Vec::new());
                }
                self.simple_grouper(criteria).resolve(buckets)
            }
            ScanMode::Smart => {
                let candidates: Candidates = walk.by_ref().collect();
                if self.finish_indexing(walk.indexed(), walk.was_cancelled()) {
                    return Ok(Vec::new());
                }
                candidates.into_groups()
            }
        };
        walk.close();

        if self.config.is_cancel_requested() {
            log::info!("Scan cancelled after {:.2?}", start.elapsed());
            return Ok(Vec::new());
        }

        log::info!(
            "Scan complete: {} groups in {:.2?}",
            groups.len(),
            start.elapsed()
        );
        let backend = self.backend();
        self.status(&ready_message(backend.map(HashBackend::name)));
        Ok(groups)
    }

    /// Log the end of indexing. Returns `true` when the scan was cancelled.
    fn finish_indexing(&self, indexed: usize, cancelled: bool) -> bool {
        if cancelled || self.config.is_cancel_requested() {
            log::info!("Scan cancelled during indexing after {} files", indexed);
            return true;
        }
        log::info!("Indexed {} files", indexed);
        self.status(&analyzing_message());
        false
    }

    fn simple_grouper(&self, criteria: Criteria) -> SimpleGrouper {
        let mut grouper = SimpleGrouper::new(criteria)
            .with_hasher(self.config.hasher)
            .with_workers(self.config.hash_workers);
        if let Some(ref flag) = self.config.cancel_flag {
            grouper = grouper.with_cancel_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            grouper = grouper.with_progress_callback(Arc::clone(callback));
        }
        grouper
    }
}
