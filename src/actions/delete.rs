//! Bulk deletion of selected items.
//!
//! # Overview
//!
//! [`execute`] collects every selected [`Item`] across all groups and
//! removes it:
//! - [`DeleteMode::Trash`]: move to the platform trash (recoverable)
//! - [`DeleteMode::Permanent`]: unlink (unrecoverable)
//!
//! One failure never aborts the batch. Each failure is reported with its
//! path and the rest of the batch continues. The group list itself is left
//! untouched; callers rescan afterwards.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::actions::{execute, DeleteMode};
//! use simdupe::duplicates::Group;
//!
//! let groups: Vec<Group> = Vec::new();
//! let report = execute(&groups, DeleteMode::Trash);
//! println!("{}", report.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::{Group, GroupListExt};

/// Whether this platform has a trash facility the `trash` crate can use.
#[must_use]
pub fn trash_available() -> bool {
    cfg!(any(
        target_os = "windows",
        target_os = "macos",
        all(unix, not(any(target_os = "ios", target_os = "android")))
    ))
}

/// How selected files are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Move to the platform trash
    #[default]
    Trash,
    /// Unlink directly
    Permanent,
}

impl DeleteMode {
    /// The mode that will actually run on this platform.
    ///
    /// Trash degrades to permanent deletion when no trash facility exists.
    /// The UI must confirm that with the user before calling [`execute`].
    #[must_use]
    pub fn effective(self) -> Self {
        match self {
            Self::Trash if !trash_available() => Self::Permanent,
            mode => mode,
        }
    }

    /// Whether the removal cannot be undone.
    #[must_use]
    pub fn is_permanent(self) -> bool {
        self.effective() == Self::Permanent
    }

    /// Lowercase name, e.g. `trash`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trash => "trash",
            Self::Permanent => "permanent",
        }
    }
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for single-file deletion.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is a directory, not a file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_stat(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Stat the target and return its size, refusing anything but a file.
fn file_size(path: &Path) -> Result<u64, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_stat(path, e))?;
    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }
    Ok(metadata.len())
}

/// Move a single file to the trash. Returns the bytes freed.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if it cannot be read
/// - `TrashFailed` if the trash facility refuses it
pub fn delete_to_trash(path: &Path) -> Result<u64, DeleteError> {
    let size = file_size(path)?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Permanently delete a single file. Returns the bytes freed.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if it cannot be read
/// - `PermanentDeleteFailed` if the unlink fails
pub fn permanent_delete(path: &Path) -> Result<u64, DeleteError> {
    let size = file_size(path)?;

    fs::remove_file(path).map_err(|e| DeleteError::PermanentDeleteFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Delete one file in the given mode.
///
/// # Errors
///
/// See [`delete_to_trash`] and [`permanent_delete`].
pub fn delete_file(path: &Path, mode: DeleteMode) -> Result<u64, DeleteError> {
    match mode.effective() {
        DeleteMode::Trash => delete_to_trash(path),
        DeleteMode::Permanent => permanent_delete(path),
    }
}

/// Outcome of a batch deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    /// Files removed
    pub successes: usize,
    /// One message per failed file, naming its path
    pub errors: Vec<String>,
    /// Bytes freed by the removed files
    pub bytes_freed: u64,
}

impl ExecuteReport {
    /// Whether every file was removed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize(self.bytes_freed);
        if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.successes, freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.successes,
                self.errors.len(),
                freed
            )
        }
    }
}

/// Delete a flat list of paths, continuing past failures.
pub fn execute_paths<P: AsRef<Path>>(paths: &[P], mode: DeleteMode) -> ExecuteReport {
    let effective = mode.effective();
    if effective != mode {
        log::warn!("No trash facility available, deleting permanently");
    }

    let mut report = ExecuteReport::default();
    for path in paths {
        let path = path.as_ref();
        match delete_file(path, effective) {
            Ok(size) => {
                report.successes += 1;
                report.bytes_freed += size;
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                report.errors.push(e.to_string());
            }
        }
    }

    log::info!("{}", report.summary());
    report
}

/// Delete every selected item in every group.
///
/// The groups are only read. No de-duplication is performed because grouping
/// never places one path in two groups.
pub fn execute(groups: &[Group], mode: DeleteMode) -> ExecuteReport {
    let paths: Vec<&Path> = groups
        .selected_items()
        .into_iter()
        .map(|item| item.path.as_path())
        .collect();
    log::info!("Executing {} deletion of {} file(s)", mode, paths.len());
    execute_paths(&paths, mode)
}
