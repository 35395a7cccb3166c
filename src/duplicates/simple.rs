//! Simple-mode grouping: cheap criteria, optionally confirmed by content.
//!
//! # Overview
//!
//! 1. **Pre-bucket**: stream entries into buckets keyed by file name and/or
//!    size. Buckets with a single entry are dropped.
//! 2. Without hashing every bucket becomes a `Match:` group.
//! 3. With hashing each bucket is confirmed in two phases on a bounded
//!    worker pool:
//!    - **Phase A**: re-bucket by partial (head + tail) digest
//!    - **Phase B**: re-bucket survivors by full digest
//!
//! A file whose digest is empty (read failure) never matches anything.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::duplicates::{Criteria, SimpleGrouper};
//! use simdupe::scanner::Walker;
//! use std::path::Path;
//!
//! let walk = Walker::new(Path::new(".")).walk().expect("root is readable");
//! let groups = SimpleGrouper::new(Criteria::new(false, true, true)).group(walk);
//! println!("{} duplicate groups", groups.len());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{Group, Item};
use crate::progress::{hashing_message, StatusCallback};
use crate::scanner::{FileEntry, Hasher};

/// Upper bound on hash worker threads.
pub const MAX_HASH_WORKERS: usize = 8;

/// Default hash pool size: `min(8, available cores)`.
#[must_use]
pub fn default_hash_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_HASH_WORKERS)
}

/// Simple-mode criteria flags.
///
/// Always normalized: at least one of `by_name`/`by_size` is set when the
/// flags are used for pre-bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Criteria {
    /// Same file name
    pub by_name: bool,
    /// Same size in bytes
    pub by_size: bool,
    /// Same content, confirmed by digest
    pub by_hash: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self::new(false, true, true)
    }
}

impl Criteria {
    /// Build normalized criteria. All flags off means name-only.
    #[must_use]
    pub fn new(by_name: bool, by_size: bool, by_hash: bool) -> Self {
        Self {
            by_name,
            by_size,
            by_hash,
        }
        .normalized()
    }

    /// Coerce all-false flags to name-only.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.by_name || self.by_size || self.by_hash {
            self
        } else {
            Self {
                by_name: true,
                ..self
            }
        }
    }

    /// Whether the file name is part of the pre-bucket key.
    ///
    /// Hash-only criteria fall back to the name so that the whole tree is
    /// never hashed unconditionally.
    #[must_use]
    pub fn keys_on_name(&self) -> bool {
        self.by_name || !self.by_size
    }

    /// Whether the size is part of the pre-bucket key.
    #[must_use]
    pub fn keys_on_size(&self) -> bool {
        self.by_size
    }

    /// Short human-readable description, e.g. `name+size+hash`.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [
            (self.by_name, "name"),
            (self.by_size, "size"),
            (self.by_hash, "hash"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect();
        parts.join("+")
    }
}

/// Pre-bucket key built from the enabled cheap criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    name: Option<String>,
    size: Option<u64>,
}

impl BucketKey {
    fn for_entry(entry: &FileEntry, criteria: &Criteria) -> Self {
        Self {
            name: criteria.keys_on_name().then(|| entry.file_name()),
            size: criteria.keys_on_size().then_some(entry.size),
        }
    }

    /// Key parts in display order, name first.
    #[must_use]
    pub fn parts(&self) -> Vec<String> {
        self.name
            .iter()
            .cloned()
            .chain(self.size.map(|s| s.to_string()))
            .collect()
    }
}

/// Buckets of entries sharing a [`BucketKey`], all with two or more members.
pub type Buckets = HashMap<BucketKey, Vec<FileEntry>>;

/// Stream entries into cheap-criteria buckets and drop singletons.
pub fn pre_bucket<I>(entries: I, criteria: &Criteria) -> Buckets
where
    I: IntoIterator<Item = FileEntry>,
{
    let criteria = criteria.normalized();
    let mut buckets: Buckets = HashMap::new();
    let mut seen = 0usize;

    for entry in entries {
        seen += 1;
        buckets
            .entry(BucketKey::for_entry(&entry, &criteria))
            .or_default()
            .push(entry);
    }

    buckets.retain(|_, members| members.len() >= 2);
    log::debug!(
        "Pre-bucketing ({}): {} files into {} candidate buckets",
        criteria.describe(),
        seen,
        buckets.len()
    );
    buckets
}

/// Re-bucket entries by a digest, dropping empty digests and singletons.
fn rebucket<F>(entries: Vec<FileEntry>, digest: F) -> Vec<(String, Vec<FileEntry>)>
where
    F: Fn(&FileEntry) -> String,
{
    let mut by_digest: HashMap<String, Vec<FileEntry>> = HashMap::new();
    for entry in entries {
        let key = digest(&entry);
        if key.is_empty() {
            log::trace!("Dropping unreadable file: {}", entry.path.display());
            continue;
        }
        by_digest.entry(key).or_default().push(entry);
    }
    by_digest
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .collect()
}

/// Two-phase confirmation of one bucket. Files are hashed sequentially.
fn confirm_bucket(hasher: &Hasher, bucket: Vec<FileEntry>) -> Vec<Group> {
    let small = hasher.chunk_size() * 2;

    rebucket(bucket, |e| hasher.partial_digest(&e.path, e.size))
        .into_iter()
        .flat_map(|(partial, candidates)| {
            // Below two chunks the partial digest already covers the whole file
            rebucket(candidates, |e| {
                if e.size < small {
                    partial.clone()
                } else {
                    hasher.full_digest(&e.path)
                }
            })
        })
        .map(|(digest, members)| {
            Group::hashed(&digest, members.into_iter().map(Item::from).collect())
        })
        .collect()
}

/// Simple-mode grouper.
///
/// # Example
///
/// ```
/// use simdupe::duplicates::{Criteria, SimpleGrouper};
///
/// let grouper = SimpleGrouper::new(Criteria::new(true, false, false)).with_workers(2);
/// assert!(grouper.group(Vec::new()).is_empty());
/// ```
#[derive(Clone)]
pub struct SimpleGrouper {
    criteria: Criteria,
    hasher: Hasher,
    workers: usize,
    cancel_flag: Option<Arc<AtomicBool>>,
    progress: Option<Arc<dyn StatusCallback>>,
}

impl std::fmt::Debug for SimpleGrouper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleGrouper")
            .field("criteria", &self.criteria)
            .field("hasher", &self.hasher)
            .field("workers", &self.workers)
            .field("cancel_flag", &self.cancel_flag)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl SimpleGrouper {
    /// Create a grouper for the given criteria.
    #[must_use]
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria: criteria.normalized(),
            hasher: Hasher::new(),
            workers: default_hash_workers(),
            cancel_flag: None,
            progress: None,
        }
    }

    /// Use a specific hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the number of hash worker threads (at least 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the cancellation flag, polled before each bucket is hashed.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Set the progress callback, invoked with `"Hashing: N/M"` per bucket.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn StatusCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The normalized criteria.
    #[must_use]
    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Group a stream of entries.
    pub fn group<I>(&self, entries: I) -> Vec<Group>
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.resolve(pre_bucket(entries, &self.criteria))
    }

    /// Turn pre-built buckets into groups, hashing when enabled.
    ///
    /// Returns an empty list when cancelled mid-way.
    pub fn resolve(&self, buckets: Buckets) -> Vec<Group> {
        if !self.criteria.by_hash {
            return buckets
                .into_iter()
                .map(|(key, members)| {
                    Group::matched(&key.parts(), members.into_iter().map(Item::from).collect())
                })
                .collect();
        }

        let groups = self.confirm_all(buckets.into_values().collect());
        if self.is_cancel_requested() {
            log::info!("Hashing cancelled, discarding partial results");
            return Vec::new();
        }
        groups
    }

    fn confirm_all(&self, buckets: Vec<Vec<FileEntry>>) -> Vec<Group> {
        let total = buckets.len();
        if total == 0 {
            return Vec::new();
        }

        let files: usize = buckets.iter().map(Vec::len).sum();
        log::info!(
            "Hashing {} files in {} buckets on {} workers ({})",
            files,
            total,
            self.workers,
            self.hasher.backend()
        );

        let done = AtomicUsize::new(0);
        let hash_one = |bucket: Vec<FileEntry>| -> Vec<Group> {
            if self.is_cancel_requested() {
                return Vec::new();
            }
            let groups = confirm_bucket(&self.hasher, bucket);
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(ref callback) = self.progress {
                callback.on_status(&hashing_message(finished, total));
            }
            groups
        };

        let groups: Vec<Group> = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("simdupe-hash-{}", i))
            .build()
        {
            Ok(pool) => pool.install(|| buckets.into_par_iter().flat_map_iter(hash_one).collect()),
            Err(e) => {
                log::warn!("Failed to create hash pool ({}), hashing sequentially", e);
                buckets.into_iter().flat_map(hash_one).collect()
            }
        };

        log::info!(
            "Hashing complete: {} of {} buckets confirmed {} groups",
            done.load(Ordering::SeqCst),
            total,
            groups.len()
        );
        groups
    }
}
