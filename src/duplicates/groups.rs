//! Group model: grouped files and their selection state.
//!
//! # Overview
//!
//! A [`Group`] is an immutable, ordered set of two or more [`Item`]s that the
//! finder decided belong together, plus a per-item `selected` flag that the
//! user edits before deleting. Every selection operation only flips flags;
//! membership and order never change after construction.
//!
//! Group names carry a typed prefix that maps to a [`Badge`]:
//!
//! | Prefix | Badge | Produced by |
//! |--------|-------|-------------|
//! | `HASH:` | [`Badge::Hash`] | simple mode with content hashing |
//! | `SEQ:` | [`Badge::Seq`] | smart mode, numbered sequences |
//! | `VER:` | [`Badge::Ver`] | smart mode, versioned variants |
//! | `Match:` | [`Badge::Match`] | simple mode by name and/or size |
//!
//! # Example
//!
//! ```
//! use simdupe::duplicates::{Badge, Group, Item};
//! use std::path::PathBuf;
//! use std::time::{Duration, SystemTime};
//!
//! let old = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
//! let new = SystemTime::UNIX_EPOCH + Duration::from_secs(20);
//! let mut group = Group::new(
//!     "Match: report.pdf",
//!     vec![
//!         Item::new(PathBuf::from("/a/report.pdf"), 100, old),
//!         Item::new(PathBuf::from("/b/report.pdf"), 100, new),
//!     ],
//! );
//!
//! assert_eq!(group.badge(), Badge::Match);
//! group.mark_all_except_newest();
//! assert!(group.items()[0].selected);
//! assert!(!group.items()[1].selected);
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::scanner::FileEntry;

/// Group kind tag derived from the name prefix. Drives UI coloring only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Badge {
    /// Content-hash confirmed duplicates
    Hash,
    /// Numbered sequence (frames, pages)
    Seq,
    /// Versioned variants of one artifact
    Ver,
    /// Cheap name/size match
    Match,
}

impl Badge {
    /// The name prefix for this badge, without the colon.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Seq => "SEQ",
            Self::Ver => "VER",
            Self::Match => "Match",
        }
    }

    /// Short label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Seq => "SEQ",
            Self::Ver => "VER",
            Self::Match => "MATCH",
        }
    }

    /// Derive the badge from a prefixed group name. Unknown prefixes map
    /// to [`Badge::Match`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        [Self::Hash, Self::Seq, Self::Ver]
            .into_iter()
            .find(|badge| {
                name.strip_prefix(badge.prefix())
                    .is_some_and(|rest| rest.starts_with(':'))
            })
            .unwrap_or(Self::Match)
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single file inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Size in bytes, captured at scan time
    pub size: u64,
    /// Modification time, captured at scan time
    pub mtime: SystemTime,
    /// Marked for deletion
    pub selected: bool,
}

impl Item {
    /// Create an unselected item.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, mtime: SystemTime) -> Self {
        Self {
            path,
            size,
            mtime,
            selected: false,
        }
    }

    /// The final path component as a lossy string.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Case-insensitive substring test against the full path.
    #[must_use]
    pub fn path_contains(&self, needle_lower: &str) -> bool {
        self.path
            .to_string_lossy()
            .to_lowercase()
            .contains(needle_lower)
    }
}

impl From<FileEntry> for Item {
    fn from(entry: FileEntry) -> Self {
        Self::new(entry.path, entry.size, entry.modified)
    }
}

/// An ordered group of two or more related files.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    items: Vec<Item>,
    total_size: u64,
    badge: Badge,
}

impl Group {
    /// Create a group from a prefixed name and its members.
    ///
    /// The badge is derived from the name prefix and the total size is
    /// computed once here.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if fewer than two items are given.
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        debug_assert!(items.len() >= 2, "a group needs at least two items");
        let name = name.into();
        Self {
            badge: Badge::from_name(&name),
            total_size: items.iter().map(|i| i.size).sum(),
            name,
            items,
        }
    }

    /// A hash-confirmed group: `HASH: <first 8 digest chars>...`.
    #[must_use]
    pub fn hashed(digest: &str, items: Vec<Item>) -> Self {
        let short: String = digest.chars().take(8).collect();
        Self::new(format!("{}: {}...", Badge::Hash.prefix(), short), items)
    }

    /// A cheap-criteria group: `Match: <parts joined by " | ">`.
    #[must_use]
    pub fn matched(key_parts: &[String], items: Vec<Item>) -> Self {
        Self::new(
            format!("{}: {}", Badge::Match.prefix(), key_parts.join(" | ")),
            items,
        )
    }

    /// A smart-mode group: `<SEQ|VER>: <parent>/<stem>`.
    #[must_use]
    pub fn patterned(badge: Badge, parent: &str, stem: &str, items: Vec<Item>) -> Self {
        Self::new(format!("{}: {}/{}", badge.prefix(), parent, stem), items)
    }

    /// Full prefixed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with the typed prefix stripped, for display next to the badge.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, rest)| rest.trim_start())
    }

    /// Badge derived from the name prefix.
    #[must_use]
    pub fn badge(&self) -> Badge {
        self.badge
    }

    /// Members in group order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for groups produced by the finder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of member sizes, fixed at construction.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of selected members.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }

    /// Total size of selected members.
    #[must_use]
    pub fn selected_size(&self) -> u64 {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.size)
            .sum()
    }

    /// Whether any member path equals `path`.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.items.iter().any(|i| i.path == path)
    }

    /// Set every member's selection to `state`.
    pub fn select_all(&mut self, state: bool) {
        for item in &mut self.items {
            item.selected = state;
        }
    }

    /// Flip every member's selection.
    pub fn invert(&mut self) {
        for item in &mut self.items {
            item.selected = !item.selected;
        }
    }

    /// Flip one member's selection. Returns the new state, or `None` when
    /// `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    /// Select by case-insensitive path substring.
    ///
    /// With `keep == false` matching members become selected and the rest
    /// unselected. With `keep == true` it is the exact complement: matches
    /// are kept (unselected) and everything else is selected.
    ///
    /// Returns how many members changed state.
    pub fn select_by_pattern(&mut self, substring: &str, keep: bool) -> usize {
        let needle = substring.to_lowercase();
        let mut flipped = 0;
        for item in &mut self.items {
            let target = item.path_contains(&needle) != keep;
            if item.selected != target {
                item.selected = target;
                flipped += 1;
            }
        }
        flipped
    }

    /// Select everything except the newest member.
    ///
    /// Ties on the newest mtime resolve to the last such member in group order.
    pub fn mark_all_except_newest(&mut self) {
        let keep = self
            .items
            .iter()
            .enumerate()
            .max_by_key(|(_, item)| item.mtime)
            .map(|(index, _)| index);
        self.select_all_except(keep);
    }

    /// Select everything except the oldest member.
    ///
    /// Ties on the oldest mtime resolve to the first such member in group order.
    pub fn mark_all_except_oldest(&mut self) {
        let keep = self
            .items
            .iter()
            .enumerate()
            .min_by_key(|(_, item)| item.mtime)
            .map(|(index, _)| index);
        self.select_all_except(keep);
    }

    fn select_all_except(&mut self, keep: Option<usize>) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.selected = Some(index) != keep;
        }
    }
}

/// Whole-list selection folds over the per-group operations.
pub trait GroupListExt {
    /// Set every item in every group to `state`.
    fn select_all(&mut self, state: bool);
    /// Invert every item in every group.
    fn invert_all(&mut self);
    /// Keep the newest item of each group, select the rest.
    fn keep_newest(&mut self);
    /// Keep the oldest item of each group, select the rest.
    fn keep_oldest(&mut self);
    /// Pattern selection across all groups; returns total flips.
    fn select_by_pattern(&mut self, substring: &str, keep: bool) -> usize;
    /// Every selected item across all groups, in list order.
    fn selected_items(&self) -> Vec<&Item>;
    /// Number of selected items across all groups.
    fn selected_count(&self) -> usize;
    /// Number of items across all groups.
    fn item_count(&self) -> usize;
}

impl GroupListExt for [Group] {
    fn select_all(&mut self, state: bool) {
        self.iter_mut().for_each(|g| g.select_all(state));
    }

    fn invert_all(&mut self) {
        self.iter_mut().for_each(Group::invert);
    }

    fn keep_newest(&mut self) {
        self.iter_mut().for_each(Group::mark_all_except_newest);
    }

    fn keep_oldest(&mut self) {
        self.iter_mut().for_each(Group::mark_all_except_oldest);
    }

    fn select_by_pattern(&mut self, substring: &str, keep: bool) -> usize {
        self.iter_mut()
            .map(|g| g.select_by_pattern(substring, keep))
            .sum()
    }

    fn selected_items(&self) -> Vec<&Item> {
        self.iter()
            .flat_map(|g| g.items().iter().filter(|i| i.selected))
            .collect()
    }

    fn selected_count(&self) -> usize {
        self.iter().map(Group::selected_count).sum()
    }

    fn item_count(&self) -> usize {
        self.iter().map(Group::len).sum()
    }
}
