//! View model: sorting, filtering and pagination of the group list.
//!
//! The view model takes ownership of the scan result and exposes it page by
//! page. Selection changes go straight to the [`Group`]s through
//! [`ViewModel::group_mut`] or [`ViewModel::groups_mut`].
//!
//! # Example
//!
//! ```
//! use simdupe::view::{SortKey, ViewModel};
//!
//! let mut view = ViewModel::new(Vec::new());
//! view.sort(SortKey::Size);
//! assert_eq!(view.page_count(), 0);
//! assert!(view.page(0).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::duplicates::{Group, GroupListExt};

/// Groups per page.
pub const PAGE_SIZE: usize = 100;

/// Sort order for the group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Total size, largest first
    Size,
    /// Item count, largest first
    Count,
    /// Name, ascending and case-insensitive
    Name,
}

impl SortKey {
    /// Next key in the `Size -> Count -> Name` cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Size => Self::Count,
            Self::Count => Self::Name,
            Self::Name => Self::Size,
        }
    }

    /// Lowercase label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Count => "count",
            Self::Name => "name",
        }
    }
}

/// Totals across the whole group list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Number of groups
    pub total_groups: usize,
    /// Items marked for deletion
    pub total_selected_items: usize,
    /// Items in all groups
    pub total_items: usize,
    /// Bytes that deleting the selection would free
    pub reclaimable: u64,
}

/// Sorted, filtered, paginated view over a group list.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    groups: Vec<Group>,
    visible: Vec<usize>,
    sort_key: Option<SortKey>,
    filter: String,
    page: usize,
}

impl ViewModel {
    /// Take ownership of a scan result. Order is left as given until
    /// [`ViewModel::sort`] is called.
    #[must_use]
    pub fn new(groups: Vec<Group>) -> Self {
        let mut view = Self {
            groups,
            ..Self::default()
        };
        view.refresh_visible();
        view
    }

    /// Reorder the whole list and reset to the first page.
    ///
    /// The sort is stable, so equal keys keep their relative order and
    /// sorting twice by the same key changes nothing.
    pub fn sort(&mut self, by: SortKey) {
        match by {
            SortKey::Size => self
                .groups
                .sort_by(|a, b| b.total_size().cmp(&a.total_size())),
            SortKey::Count => self.groups.sort_by(|a, b| b.len().cmp(&a.len())),
            SortKey::Name => self
                .groups
                .sort_by_cached_key(|g| g.name().to_lowercase()),
        }
        self.sort_key = Some(by);
        self.refresh_visible();
        self.page = 0;
        log::debug!("Sorted {} groups by {}", self.groups.len(), by.label());
    }

    /// The last sort applied, if any.
    #[must_use]
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    /// Restrict the visible list to groups whose display name or any item
    /// path contains `needle` (case-insensitive). An empty needle clears
    /// the filter. Resets to the first page.
    pub fn set_filter(&mut self, needle: &str) {
        self.filter = needle.trim().to_string();
        self.refresh_visible();
        self.page = 0;
    }

    /// Current filter text.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn refresh_visible(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| {
                needle.is_empty()
                    || g.display_name().to_lowercase().contains(&needle)
                    || g.items().iter().any(|i| i.path_contains(&needle))
            })
            .map(|(index, _)| index)
            .collect();
    }

    /// Number of groups passing the filter.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Number of pages of visible groups.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(PAGE_SIZE)
    }

    /// Current page cursor.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Move the page cursor, clamped to the last page.
    pub fn set_page(&mut self, index: usize) {
        self.page = index.min(self.page_count().saturating_sub(1));
    }

    /// Advance one page. Returns whether the cursor moved.
    pub fn next_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page + 1);
        self.page != before
    }

    /// Go back one page. Returns whether the cursor moved.
    pub fn prev_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page.saturating_sub(1));
        self.page != before
    }

    /// Group indices on page `index`, empty past the end.
    #[must_use]
    pub fn page_indices(&self, index: usize) -> &[usize] {
        let start = index.saturating_mul(PAGE_SIZE).min(self.visible.len());
        let end = (start + PAGE_SIZE).min(self.visible.len());
        &self.visible[start..end]
    }

    /// Up to [`PAGE_SIZE`] visible groups on page `index`.
    #[must_use]
    pub fn page(&self, index: usize) -> Vec<&Group> {
        self.page_indices(index)
            .iter()
            .filter_map(|&i| self.groups.get(i))
            .collect()
    }

    /// Group by list index.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Mutable group by list index, for selection changes.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    /// The full list in current order, ignoring the filter.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The full list, for global selection folds.
    pub fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    /// Give the list back.
    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    /// Totals over every group, filtered or not.
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate {
            total_groups: self.groups.len(),
            total_selected_items: self.groups.selected_count(),
            total_items: self.groups.item_count(),
            reclaimable: self.groups.iter().map(Group::selected_size).sum(),
        }
    }
}
