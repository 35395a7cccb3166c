//! JSON report of a scan for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "badge": "HASH",
//!       "name": "HASH: 1f3a9c0b...",
//!       "display_name": "1f3a9c0b...",
//!       "total_size": 2048,
//!       "items": [
//!         {
//!           "path": "/photos/a.png",
//!           "size": 1024,
//!           "modified": "2024-05-01T10:00:00+00:00",
//!           "selected": false
//!         }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "mode": "simple (size+hash)",
//!     "backend": "xxHash64",
//!     "total_groups": 1,
//!     "total_items": 2,
//!     "total_selected_items": 0,
//!     "reclaimable": 0,
//!     "scan_duration_ms": 12
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use simdupe::duplicates::{Finder, ScanMode};
//! use simdupe::output::json::JsonOutput;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let finder = Finder::with_defaults();
//! let groups = finder.scan(Path::new(".")).unwrap();
//! let output = JsonOutput::new(&groups, &ScanMode::default(), finder.backend(), Duration::ZERO);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{Badge, Finder, FinderError, Group, GroupListExt, Item, ScanMode};
use crate::scanner::HashBackend;
use crate::view::{SortKey, ViewModel};

/// One file in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonItem {
    /// Absolute path
    pub path: String,
    /// Size in bytes at scan time
    pub size: u64,
    /// Modification time as RFC 3339
    pub modified: String,
    /// Marked for deletion
    pub selected: bool,
}

impl From<&Item> for JsonItem {
    fn from(item: &Item) -> Self {
        Self {
            path: item.path.to_string_lossy().into_owned(),
            size: item.size,
            modified: rfc3339(item.mtime),
            selected: item.selected,
        }
    }
}

/// One group in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Kind tag
    pub badge: Badge,
    /// Full prefixed name
    pub name: String,
    /// Name without the prefix
    pub display_name: String,
    /// Sum of member sizes
    pub total_size: u64,
    /// Members in group order
    pub items: Vec<JsonItem>,
}

impl From<&Group> for JsonGroup {
    fn from(group: &Group) -> Self {
        Self {
            badge: group.badge(),
            name: group.name().to_string(),
            display_name: group.display_name().to_string(),
            total_size: group.total_size(),
            items: group.items().iter().map(JsonItem::from).collect(),
        }
    }
}

/// Scan-level totals.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Scan mode label
    pub mode: String,
    /// Hash backend, when content hashing ran
    pub backend: Option<&'static str>,
    /// Number of groups
    pub total_groups: usize,
    /// Items in all groups
    pub total_items: usize,
    /// Items marked for deletion
    pub total_selected_items: usize,
    /// Bytes the selection would free
    pub reclaimable: u64,
    /// Wall-clock scan time in milliseconds
    pub scan_duration_ms: u64,
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Groups in the order given
    pub groups: Vec<JsonGroup>,
    /// Totals
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build a report from a scan result.
    #[must_use]
    pub fn new(
        groups: &[Group],
        mode: &ScanMode,
        backend: Option<HashBackend>,
        scan_duration: Duration,
    ) -> Self {
        Self {
            groups: groups.iter().map(JsonGroup::from).collect(),
            summary: JsonSummary {
                mode: mode.label(),
                backend: backend.map(HashBackend::name),
                total_groups: groups.len(),
                total_items: groups.item_count(),
                total_selected_items: groups.selected_count(),
                reclaimable: groups.iter().map(Group::selected_size).sum(),
                scan_duration_ms: u64::try_from(scan_duration.as_millis()).unwrap_or(u64::MAX),
            },
        }
    }

    /// Scan `root` and report the groups largest first, the same order the
    /// TUI opens with.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Root`] when the root cannot be read.
    pub fn from_scan(finder: &Finder, root: &Path) -> Result<Self, FinderError> {
        let start = Instant::now();
        let mut view = ViewModel::new(finder.scan(root)?);
        view.sort(SortKey::Size);
        Ok(Self::new(
            view.groups(),
            &finder.config().mode,
            finder.backend(),
            start.elapsed(),
        ))
    }

    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

/// Error type for JSON report generation.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// Serialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing failed.
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
