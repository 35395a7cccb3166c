//! TUI application state management.
//!
//! # Overview
//!
//! This module manages the application state for the interactive TUI, including:
//! - Current mode (Scanning, Reviewing, Prompting, Confirming, ShowingErrors, Quitting)
//! - The [`ViewModel`] holding the scan result
//! - Navigation state (focused group and item)
//! - The active scan mode, delete mode and status line
//!
//! # Architecture
//!
//! `App` is owned by the UI thread. Selection changes go straight to the
//! groups inside the view model. Work with side effects (starting a scan,
//! running deletions) is left to the run loop, which asks the app what to do
//! through [`App::take_rescan_request`] and the mode returned after an action.
//!
//! # Example
//!
//! ```
//! use simdupe::duplicates::{Group, Item, ScanMode};
//! use simdupe::actions::DeleteMode;
//! use simdupe::tui::app::{Action, App, AppMode};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let mut app = App::new(PathBuf::from("."), ScanMode::default(), DeleteMode::Trash);
//! let t = SystemTime::UNIX_EPOCH;
//! app.finish_scan(
//!     vec![Group::new(
//!         "HASH: 0123abcd...",
//!         vec![
//!             Item::new(PathBuf::from("/a.txt"), 10, t),
//!             Item::new(PathBuf::from("/b.txt"), 10, t),
//!         ],
//!     )],
//!     None,
//! );
//! assert_eq!(app.mode(), AppMode::Reviewing);
//!
//! app.handle_action(Action::NavigateDown);
//! app.handle_action(Action::ToggleSelect);
//! assert_eq!(app.aggregate().total_selected_items, 1);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::actions::{DeleteMode, ExecuteReport};
use crate::duplicates::{Criteria, Group, GroupListExt, Item, ScanMode};
use crate::progress::{indexing_started_message, ready_message};
use crate::view::{Aggregate, SortKey, ViewModel, PAGE_SIZE};

use super::theme::Theme;

/// Text prompts opened from the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Select every item whose path contains the text
    SelectPattern,
    /// Keep every item whose path contains the text, select the rest
    KeepPattern,
    /// Restrict the group list
    Filter,
}

impl Prompt {
    /// Dialog title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SelectPattern => "Select paths containing",
            Self::KeepPattern => "Keep paths containing",
            Self::Filter => "Filter groups",
        }
    }
}

/// Application mode/state.
///
/// Represents the current state of the TUI application. Modes control
/// what is displayed and which actions are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Scan in progress, status line only
    #[default]
    Scanning,
    /// Reviewing groups, main navigation mode
    Reviewing,
    /// Reading text for a prompt
    Prompting(Prompt),
    /// Waiting for deletion confirmation
    Confirming,
    /// Listing errors from the last scan or deletion
    ShowingErrors,
    /// Application is exiting
    Quitting,
}

impl AppMode {
    /// Check if navigation is allowed in this mode.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        matches!(self, Self::Reviewing)
    }

    /// Check if the app should exit.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }
}

/// User actions that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move to the previous item (or the last item of the previous group)
    NavigateUp,
    /// Move to the next item (or the first item of the next group)
    NavigateDown,
    /// Jump to the next group
    NextGroup,
    /// Jump to the previous group
    PreviousGroup,
    /// Show the next page of groups
    NextPage,
    /// Show the previous page of groups
    PreviousPage,
    /// Toggle the focused item
    ToggleSelect,
    /// Select every item in the focused group
    SelectAllInGroup,
    /// Clear the focused group
    DeselectGroup,
    /// Invert the focused group
    InvertGroup,
    /// Select every item in every group
    SelectAll,
    /// Clear every selection
    DeselectAll,
    /// Invert every group
    InvertAll,
    /// Keep the newest item of each group
    KeepNewest,
    /// Keep the oldest item of each group
    KeepOldest,
    /// Open the select-by-pattern prompt
    SelectByPattern,
    /// Open the keep-by-pattern prompt
    KeepByPattern,
    /// Open the filter prompt
    Filter,
    /// Cycle the sort key
    CycleSort,
    /// Switch between simple and smart mode and rescan
    ToggleScanMode,
    /// Flip the name criterion (simple mode)
    ToggleByName,
    /// Flip the size criterion (simple mode)
    ToggleBySize,
    /// Flip the hash criterion (simple mode)
    ToggleByHash,
    /// Switch between trash and permanent deletion
    ToggleDeleteMode,
    /// Scan again with the current settings
    Rescan,
    /// Ask to delete the selection
    Delete,
    /// Confirm the open dialog
    Confirm,
    /// Close the open dialog, or cancel a running scan
    Cancel,
    /// Exit
    Quit,
    /// Typed character for a prompt
    Input(char),
    /// Erase the last prompt character
    Backspace,
}

/// Main application state container.
#[derive(Debug)]
pub struct App {
    mode: AppMode,
    root: PathBuf,
    scan_mode: ScanMode,
    /// Last simple-mode criteria, restored when leaving smart mode
    criteria: Criteria,
    delete_mode: DeleteMode,
    view: ViewModel,
    sort_key: SortKey,
    /// Position of the focused group in the visible list
    cursor: usize,
    item_index: usize,
    status: String,
    backend: Option<&'static str>,
    input: String,
    message: Option<String>,
    errors: Vec<String>,
    cancel_flag: Option<Arc<AtomicBool>>,
    rescan_requested: bool,
    theme: Theme,
}

impl App {
    /// Create an app that is about to scan `root`.
    #[must_use]
    pub fn new(root: PathBuf, scan_mode: ScanMode, delete_mode: DeleteMode) -> Self {
        let criteria = match scan_mode {
            ScanMode::Simple(criteria) => criteria,
            ScanMode::Smart => Criteria::default(),
        };
        Self {
            mode: AppMode::Scanning,
            root,
            scan_mode,
            criteria,
            delete_mode,
            view: ViewModel::default(),
            sort_key: SortKey::Size,
            cursor: 0,
            item_index: 0,
            status: indexing_started_message(),
            backend: None,
            input: String::new(),
            message: None,
            errors: Vec::new(),
            cancel_flag: None,
            rescan_requested: false,
            theme: Theme::default(),
        }
    }

    /// Set the color palette.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    // ==================== Accessors ====================

    /// Get the current application mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Set the application mode.
    pub fn set_mode(&mut self, mode: AppMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    /// Directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mode used by the next scan.
    #[must_use]
    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    /// Requested delete mode.
    #[must_use]
    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    /// The sorted, filtered group list.
    #[must_use]
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Active sort key.
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Latest status line from the scanner.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Hash backend of the last completed scan.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Text typed into the open prompt.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// One-line feedback for the last action.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Active color palette.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Errors shown in the error dialog.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Totals over every group.
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        self.view.aggregate()
    }

    /// Every group, in view order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.view.groups()
    }

    // ==================== Scan Lifecycle ====================

    /// Enter scanning mode for a scan observing `cancel_flag`.
    pub fn begin_scan(&mut self, cancel_flag: Arc<AtomicBool>) {
        self.cancel_flag = Some(cancel_flag);
        self.rescan_requested = false;
        self.status = indexing_started_message();
        if !self.mode.is_done() {
            self.set_mode(AppMode::Scanning);
        }
    }

    /// Replace the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Take ownership of a finished scan and return to review.
    ///
    /// The current sort and filter are reapplied to the new list. Pending
    /// errors from a deletion are shown first.
    pub fn finish_scan(&mut self, groups: Vec<Group>, backend: Option<&'static str>) {
        let cancelled = self
            .cancel_flag
            .take()
            .is_some_and(|f| f.load(Ordering::SeqCst));
        let filter = self.view.filter().to_string();

        self.view = ViewModel::new(groups);
        self.view.sort(self.sort_key);
        self.view.set_filter(&filter);
        self.cursor = 0;
        self.item_index = 0;
        self.backend = backend;
        self.status = if cancelled {
            "Scan cancelled".to_string()
        } else {
            ready_message(backend)
        };

        log::info!(
            "Reviewing {} groups ({})",
            self.view.groups().len(),
            self.scan_mode.label()
        );
        if !self.mode.is_done() {
            self.set_mode(if self.errors.is_empty() {
                AppMode::Reviewing
            } else {
                AppMode::ShowingErrors
            });
        }
    }

    /// Record a scan that could not start.
    pub fn fail_scan(&mut self, error: String) {
        self.cancel_flag = None;
        self.view = ViewModel::default();
        self.cursor = 0;
        self.item_index = 0;
        self.status = "Scan failed".to_string();
        self.errors = vec![error];
        if !self.mode.is_done() {
            self.set_mode(AppMode::ShowingErrors);
        }
    }

    /// Record the outcome of a deletion and ask for a rescan.
    pub fn finish_execute(&mut self, report: ExecuteReport) {
        self.message = Some(report.summary());
        self.errors = report.errors;
        self.rescan_requested = true;
        if !self.mode.is_done() {
            self.set_mode(AppMode::Reviewing);
        }
    }

    /// Whether the run loop should start a new scan. Clears the request.
    pub fn take_rescan_request(&mut self) -> bool {
        std::mem::take(&mut self.rescan_requested)
    }

    fn request_rescan(&mut self) {
        self.rescan_requested = true;
    }

    fn cancel_scan(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
            self.status = "Cancelling...".to_string();
            log::info!("Scan cancellation requested");
        }
    }

    // ==================== Navigation ====================

    /// Position of the focused group in the visible list.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position of the focused group within the current page.
    #[must_use]
    pub fn cursor_in_page(&self) -> usize {
        self.cursor % PAGE_SIZE
    }

    /// Index of the focused item within its group.
    #[must_use]
    pub fn item_index(&self) -> usize {
        self.item_index
    }

    /// List index of the focused group.
    #[must_use]
    pub fn current_group_index(&self) -> Option<usize> {
        self.view
            .page_indices(self.cursor / PAGE_SIZE)
            .get(self.cursor % PAGE_SIZE)
            .copied()
    }

    /// The focused group.
    #[must_use]
    pub fn current_group(&self) -> Option<&Group> {
        self.current_group_index().and_then(|i| self.view.group(i))
    }

    /// The focused item.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.current_group()
            .and_then(|g| g.items().get(self.item_index))
    }

    fn current_group_mut(&mut self) -> Option<&mut Group> {
        let index = self.current_group_index()?;
        self.view.group_mut(index)
    }

    fn focus_group(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.item_index = 0;
        self.view.set_page(cursor / PAGE_SIZE);
    }

    /// Move to the next item, rolling over into the next group.
    pub fn next(&mut self) {
        let len = self.current_group().map_or(0, Group::len);
        if self.item_index + 1 < len {
            self.item_index += 1;
        } else if self.cursor + 1 < self.view.visible_len() {
            self.focus_group(self.cursor + 1);
        }
    }

    /// Move to the previous item, rolling back into the previous group.
    pub fn previous(&mut self) {
        if self.item_index > 0 {
            self.item_index -= 1;
        } else if self.cursor > 0 {
            self.focus_group(self.cursor - 1);
            self.item_index = self.current_group().map_or(0, |g| g.len().saturating_sub(1));
        }
    }

    /// Jump to the next group.
    pub fn next_group(&mut self) {
        if self.cursor + 1 < self.view.visible_len() {
            self.focus_group(self.cursor + 1);
        }
    }

    /// Jump to the previous group.
    pub fn previous_group(&mut self) {
        if self.cursor > 0 {
            self.focus_group(self.cursor - 1);
        }
    }

    /// Show the next page and focus its first group.
    pub fn next_page(&mut self) {
        if self.view.next_page() {
            self.focus_group(self.view.current_page() * PAGE_SIZE);
        }
    }

    /// Show the previous page and focus its first group.
    pub fn previous_page(&mut self) {
        if self.view.prev_page() {
            self.focus_group(self.view.current_page() * PAGE_SIZE);
        }
    }

    // ==================== Selection ====================

    /// Toggle the focused item.
    pub fn toggle_select(&mut self) {
        let index = self.item_index;
        if let Some(state) = self.current_group_mut().and_then(|g| g.toggle(index)) {
            log::trace!("Item {} selected: {}", index, state);
        }
    }

    fn with_current_group(&mut self, op: impl FnOnce(&mut Group)) {
        if let Some(group) = self.current_group_mut() {
            op(group);
        }
    }

    fn apply_pattern(&mut self, keep: bool) {
        let pattern = std::mem::take(&mut self.input);
        if pattern.is_empty() {
            return;
        }
        let flipped = self.view.groups_mut().select_by_pattern(&pattern, keep);
        let verb = if keep { "Kept" } else { "Selected" };
        self.message = Some(format!(
            "{} paths containing \"{}\" ({} changed)",
            verb, pattern, flipped
        ));
    }

    fn apply_filter(&mut self) {
        let needle = std::mem::take(&mut self.input);
        self.view.set_filter(&needle);
        self.focus_group(0);
        self.message = if needle.is_empty() {
            None
        } else {
            Some(format!(
                "{} of {} groups match \"{}\"",
                self.view.visible_len(),
                self.view.groups().len(),
                needle
            ))
        };
    }

    // ==================== Settings ====================

    fn cycle_sort(&mut self) {
        self.sort_key = self.sort_key.next();
        self.view.sort(self.sort_key);
        self.focus_group(0);
        self.message = Some(format!("Sorted by {}", self.sort_key.label()));
    }

    fn toggle_scan_mode(&mut self) {
        self.scan_mode = match self.scan_mode {
            ScanMode::Simple(_) => ScanMode::Smart,
            ScanMode::Smart => ScanMode::Simple(self.criteria),
        };
        self.message = Some(format!("Mode: {}", self.scan_mode.label()));
        self.request_rescan();
    }

    fn toggle_criterion(&mut self, flip: impl FnOnce(&mut Criteria)) {
        if let ScanMode::Simple(_) = self.scan_mode {
            let mut criteria = self.criteria;
            flip(&mut criteria);
            self.criteria = Criteria::new(criteria.by_name, criteria.by_size, criteria.by_hash);
            self.scan_mode = ScanMode::Simple(self.criteria);
            self.message = Some(format!(
                "Criteria: {} (press r to rescan)",
                self.criteria.describe()
            ));
        }
    }

    fn toggle_delete_mode(&mut self) {
        self.delete_mode = match self.delete_mode {
            DeleteMode::Trash => DeleteMode::Permanent,
            DeleteMode::Permanent => DeleteMode::Trash,
        };
        self.message = Some(format!("Delete mode: {}", self.delete_mode.effective()));
    }

    // ==================== Action Handling ====================

    /// Handle a user action and update state accordingly.
    ///
    /// Returns true if the action was handled. `Confirm` in
    /// [`AppMode::Confirming`] is left to the run loop, which performs the
    /// deletion.
    pub fn handle_action(&mut self, action: Action) -> bool {
        log::trace!("Handling action: {:?} in mode {:?}", action, self.mode);

        match self.mode {
            AppMode::Scanning => match action {
                Action::Cancel => {
                    self.cancel_scan();
                    true
                }
                Action::Quit => {
                    self.cancel_scan();
                    self.set_mode(AppMode::Quitting);
                    true
                }
                _ => false,
            },
            AppMode::Prompting(prompt) => self.handle_prompt(prompt, action),
            AppMode::Confirming => match action {
                Action::Cancel => {
                    self.set_mode(AppMode::Reviewing);
                    true
                }
                Action::Quit => {
                    self.set_mode(AppMode::Quitting);
                    true
                }
                _ => false,
            },
            AppMode::ShowingErrors => match action {
                Action::Quit => {
                    self.set_mode(AppMode::Quitting);
                    true
                }
                Action::Cancel | Action::Confirm => {
                    self.errors.clear();
                    self.set_mode(AppMode::Reviewing);
                    true
                }
                _ => false,
            },
            AppMode::Reviewing => self.handle_review(action),
            AppMode::Quitting => false,
        }
    }

    fn handle_prompt(&mut self, prompt: Prompt, action: Action) -> bool {
        match action {
            Action::Input(c) => self.input.push(c),
            Action::Backspace => {
                self.input.pop();
            }
            Action::Confirm => {
                match prompt {
                    Prompt::SelectPattern => self.apply_pattern(false),
                    Prompt::KeepPattern => self.apply_pattern(true),
                    Prompt::Filter => self.apply_filter(),
                }
                self.set_mode(AppMode::Reviewing);
            }
            Action::Cancel => {
                self.input.clear();
                self.set_mode(AppMode::Reviewing);
            }
            _ => return false,
        }
        true
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        self.input = match prompt {
            Prompt::Filter => self.view.filter().to_string(),
            Prompt::SelectPattern | Prompt::KeepPattern => String::new(),
        };
        self.set_mode(AppMode::Prompting(prompt));
    }

    fn handle_review(&mut self, action: Action) -> bool {
        match action {
            Action::NavigateUp => self.previous(),
            Action::NavigateDown => self.next(),
            Action::NextGroup => self.next_group(),
            Action::PreviousGroup => self.previous_group(),
            Action::NextPage => self.next_page(),
            Action::PreviousPage => self.previous_page(),
            Action::ToggleSelect => self.toggle_select(),
            Action::SelectAllInGroup => self.with_current_group(|g| g.select_all(true)),
            Action::DeselectGroup => self.with_current_group(|g| g.select_all(false)),
            Action::InvertGroup => self.with_current_group(Group::invert),
            Action::SelectAll => self.view.groups_mut().select_all(true),
            Action::DeselectAll => self.view.groups_mut().select_all(false),
            Action::InvertAll => self.view.groups_mut().invert_all(),
            Action::KeepNewest => {
                self.view.groups_mut().keep_newest();
                self.message = Some("Kept the newest file of each group".to_string());
            }
            Action::KeepOldest => {
                self.view.groups_mut().keep_oldest();
                self.message = Some("Kept the oldest file of each group".to_string());
            }
            Action::SelectByPattern => self.open_prompt(Prompt::SelectPattern),
            Action::KeepByPattern => self.open_prompt(Prompt::KeepPattern),
            Action::Filter => self.open_prompt(Prompt::Filter),
            Action::CycleSort => self.cycle_sort(),
            Action::ToggleScanMode => self.toggle_scan_mode(),
            Action::ToggleByName => self.toggle_criterion(|c| c.by_name = !c.by_name),
            Action::ToggleBySize => self.toggle_criterion(|c| c.by_size = !c.by_size),
            Action::ToggleByHash => self.toggle_criterion(|c| c.by_hash = !c.by_hash),
            Action::ToggleDeleteMode => self.toggle_delete_mode(),
            Action::Rescan => self.request_rescan(),
            Action::Delete => {
                if self.aggregate().total_selected_items == 0 {
                    self.message = Some("Nothing selected".to_string());
                    return false;
                }
                self.set_mode(AppMode::Confirming);
            }
            Action::Cancel => {
                if self.view.filter().is_empty() {
                    return false;
                }
                self.view.set_filter("");
                self.focus_group(0);
                self.message = Some("Filter cleared".to_string());
            }
            Action::Quit => self.set_mode(AppMode::Quitting),
            Action::Confirm | Action::Input(_) | Action::Backspace => return false,
        }
        true
    }
}
