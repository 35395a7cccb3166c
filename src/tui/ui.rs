//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! This module handles rendering the user interface including:
//! - Header with scan mode, sort key and delete mode
//! - Status line during scanning
//! - The current page of groups and the focused group's files
//! - Footer with totals and key hints
//! - Modal dialogs for prompts, confirmation and errors
//!
//! Only the current page of the view model is turned into widgets.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::tui::app::App;
//! use simdupe::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &App) {
//!     render(frame, app);
//! }
//! ```

use std::time::SystemTime;

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AppMode, Prompt};
use crate::duplicates::Group;

fn create_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
}

fn create_block_with_title<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    create_block().title(title)
}

/// Render the TUI based on current application state.
///
/// # Arguments
///
/// * `frame` - The ratatui frame to render to
/// * `app` - The application state to render
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(4), // Footer
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    match app.mode() {
        AppMode::Prompting(prompt) => render_prompt_dialog(frame, app, prompt, area),
        AppMode::Confirming => render_confirm_dialog(frame, app, area),
        AppMode::ShowingErrors => render_error_dialog(frame, app, area),
        _ => {}
    }
}

/// Render the header with title and settings.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let suffix = match app.mode() {
        AppMode::Scanning => " [Scanning...]",
        AppMode::Confirming => " [Confirm Delete]",
        AppMode::Quitting => " [Goodbye]",
        _ => "",
    };

    let mut text = format!(
        "simdupe{} | {} | sort: {} | delete: {}",
        suffix,
        app.scan_mode().label(),
        app.sort_key().label(),
        app.delete_mode().effective()
    );
    if !app.view().filter().is_empty() {
        text.push_str(&format!(" | filter: \"{}\"", app.view().filter()));
    }

    let header = Paragraph::new(text)
        .style(
            Style::default()
                .fg(app.theme().primary)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(create_block().border_style(Style::default().fg(app.theme().primary)));

    frame.render_widget(header, area);
}

/// Render the main content area based on current mode.
fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.mode() {
        AppMode::Scanning => render_scanning_content(frame, app, area),
        _ => render_reviewing_content(frame, app, area),
    }
}

/// Render the scan status.
fn render_scanning_content(frame: &mut Frame, app: &App, area: Rect) {
    let root = app.root().display().to_string();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            truncate_path(&root, area.width.saturating_sub(4) as usize),
            Style::default().fg(app.theme().dim),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.status().to_string(),
            Style::default()
                .fg(app.theme().normal)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(create_block_with_title("Scanning"));
    frame.render_widget(status, area);
}

/// Render the group list and the focused group's files.
fn render_reviewing_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.groups().is_empty() {
        let message = Paragraph::new("No duplicate or similar files found.")
            .style(Style::default().fg(app.theme().success))
            .alignment(Alignment::Center)
            .block(create_block_with_title("Results"));
        frame.render_widget(message, area);
        return;
    }

    if app.view().visible_len() == 0 {
        let message = Paragraph::new(format!("No matches for filter: '{}'", app.view().filter()))
            .style(Style::default().fg(app.theme().danger))
            .alignment(Alignment::Center)
            .block(create_block_with_title("Filter Results"));
        frame.render_widget(message, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Groups
            Constraint::Percentage(55), // Files in the focused group
        ])
        .split(area);

    render_groups_list(frame, app, chunks[0]);
    render_files_list(frame, app, chunks[1]);
}

fn group_line(app: &App, group: &Group, width: usize) -> Line<'static> {
    let badge = group.badge();
    let stats = if group.selected_count() > 0 {
        format!(
            " ({}, {}) {} sel",
            group.len(),
            format_size(group.total_size()),
            group.selected_count()
        )
    } else {
        format!(" ({}, {})", group.len(), format_size(group.total_size()))
    };
    let label_width = width.saturating_sub(badge.label().len() + 3 + stats.len());

    Line::from(vec![
        Span::styled(
            format!("[{}] ", badge.label()),
            Style::default()
                .fg(app.theme().badge_color(badge))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(truncate_string(group.display_name(), label_width)),
        Span::styled(stats, Style::default().fg(app.theme().dim)),
    ])
}

/// Render the current page of groups.
fn render_groups_list(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let page = view.current_page();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = view
        .page(page)
        .into_iter()
        .map(|group| ListItem::new(group_line(app, group, width)))
        .collect();

    let title = format!(
        "Groups ({}/{}) page {}/{}",
        app.cursor() + 1,
        view.visible_len(),
        page + 1,
        view.page_count()
    );

    let list = List::new(items)
        .block(
            create_block_with_title(title).border_style(Style::default().fg(app.theme().primary)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme().inverted_fg)
                .bg(app.theme().primary)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default().with_selected(Some(app.cursor_in_page()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the files in the focused group.
fn render_files_list(frame: &mut Frame, app: &App, area: Rect) {
    let Some(group) = app.current_group() else {
        return;
    };

    // "[x] " + "  1.0 KiB  2024-01-01 10:00"
    let max_path_len = (area.width as usize).saturating_sub(4 + 4 + 26);

    let items: Vec<ListItem> = group
        .items()
        .iter()
        .map(|item| {
            let marker = if item.selected { "[x]" } else { "[ ]" };
            let path = truncate_path(&item.path.to_string_lossy(), max_path_len);
            let style = if item.selected {
                Style::default().fg(app.theme().danger)
            } else {
                Style::default().fg(app.theme().normal)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}", marker, path), style),
                Span::styled(
                    format!("  {}  {}", format_size(item.size), format_mtime(item.mtime)),
                    Style::default().fg(app.theme().dim),
                ),
            ]))
        })
        .collect();

    let title = format!(
        "{} ({}/{}) {} selected",
        group.badge().label(),
        app.item_index() + 1,
        group.len(),
        group.selected_count()
    );

    let list = List::new(items)
        .block(
            create_block_with_title(title).border_style(Style::default().fg(app.theme().secondary)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme().inverted_fg)
                .bg(app.theme().secondary)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default().with_selected(Some(app.item_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the footer with totals, feedback and key hints.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let totals = app.aggregate();
    let mut status = vec![Span::styled(
        app.status().to_string(),
        Style::default().fg(app.theme().success),
    )];
    if app.mode() != AppMode::Scanning {
        status.push(Span::styled(
            format!(
                " | {} groups, {} files, {} selected ({})",
                totals.total_groups,
                totals.total_items,
                totals.total_selected_items,
                format_size(totals.reclaimable)
            ),
            Style::default().fg(app.theme().normal),
        ));
    }
    if let Some(message) = app.message() {
        status.push(Span::styled(
            format!(" | {}", message),
            Style::default().fg(app.theme().secondary),
        ));
    }

    let hints: Vec<Span> = footer_commands(app)
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(
                    format!("[{}]", key),
                    Style::default()
                        .fg(app.theme().secondary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} ", desc), Style::default().fg(app.theme().dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(vec![Line::from(status), Line::from(hints)])
        .alignment(Alignment::Center)
        .block(create_block().border_style(Style::default().fg(app.theme().dim)));

    frame.render_widget(footer, area);
}

fn footer_commands(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.mode() {
        AppMode::Scanning => vec![("Esc", "Cancel scan"), ("q", "Quit")],
        AppMode::Reviewing => vec![
            ("j/k", "Move"),
            ("J/K", "Group"),
            ("Space", "Toggle"),
            ("n/o", "Keep new/old"),
            ("s/S", "Pattern"),
            ("/", "Filter"),
            ("c", "Sort"),
            ("m", "Mode"),
            ("d", "Delete"),
            ("q", "Quit"),
        ],
        AppMode::Prompting(_) => vec![("Enter", "Apply"), ("Esc", "Cancel")],
        AppMode::Confirming => vec![("y", "Delete"), ("n", "Cancel")],
        AppMode::ShowingErrors => vec![("Enter", "Dismiss"), ("q", "Quit")],
        AppMode::Quitting => vec![],
    }
}

/// Render a one-line text prompt.
fn render_prompt_dialog(frame: &mut Frame, app: &App, prompt: Prompt, area: Rect) {
    let dialog_area = centered_rect(60, 20, area);
    frame.render_widget(Clear, dialog_area);

    let hint = match prompt {
        Prompt::SelectPattern => "Matching files are marked, the rest unmarked",
        Prompt::KeepPattern => "Matching files are kept, the rest marked",
        Prompt::Filter => "Empty text shows every group",
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("> {}_", app.input()),
            Style::default()
                .fg(app.theme().normal)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(app.theme().dim))),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            create_block_with_title(prompt.title())
                .border_style(Style::default().fg(app.theme().secondary)),
        );
    frame.render_widget(dialog, dialog_area);
}

/// Render the deletion confirmation.
fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, dialog_area);

    let totals = app.aggregate();
    let requested = app.delete_mode();
    let effective = requested.effective();

    let warning = if effective != requested {
        "No trash is available: files will be deleted PERMANENTLY"
    } else if effective.is_permanent() {
        "Files will be deleted permanently"
    } else {
        "Files will be moved to the trash"
    };

    let text = vec![
        Line::from(Span::styled(
            "Confirm Deletion",
            Style::default()
                .fg(app.theme().danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Delete {} file(s) ({})?",
            totals.total_selected_items,
            format_size(totals.reclaimable)
        )),
        Line::from(""),
        Line::from(Span::styled(
            warning,
            Style::default().fg(if effective.is_permanent() {
                app.theme().danger
            } else {
                app.theme().normal
            }),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[y]",
                Style::default()
                    .fg(app.theme().success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Yes    "),
            Span::styled(
                "[n]",
                Style::default()
                    .fg(app.theme().danger)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" No"),
        ]),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(create_block().border_style(Style::default().fg(app.theme().danger)));
    frame.render_widget(dialog, dialog_area);
}

/// Render the error list.
fn render_error_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(70, 50, area);
    frame.render_widget(Clear, dialog_area);

    let width = dialog_area.width.saturating_sub(4) as usize;
    let room = dialog_area.height.saturating_sub(5) as usize;
    let errors = app.errors();

    let mut lines: Vec<Line> = errors
        .iter()
        .take(room)
        .map(|e| Line::from(truncate_string(e, width)))
        .collect();
    if errors.len() > room {
        lines.push(Line::from(Span::styled(
            format!("... and {} more", errors.len() - room),
            Style::default().fg(app.theme().dim),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().fg(app.theme().dim),
    )));

    let title = format!("Errors ({})", errors.len());
    let dialog = Paragraph::new(lines).block(
        create_block_with_title(title).border_style(Style::default().fg(app.theme().danger)),
    );
    frame.render_widget(dialog, dialog_area);
}

// ==================== Helper Functions ====================

/// Format bytes as human-readable size.
///
/// Uses IEC binary units (KiB, MiB, GiB) via the bytesize crate.
///
/// # Examples
///
/// ```
/// use simdupe::tui::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert!(format_size(1024 * 1024).contains("Mi"));
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Format a modification time in local time, minute precision.
#[must_use]
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Truncate a string with ellipsis if it exceeds `max_len` characters.
///
/// # Examples
///
/// ```
/// use simdupe::tui::ui::truncate_string;
///
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Truncate a path with ellipsis, preserving the file name.
///
/// # Examples
///
/// ```
/// use simdupe::tui::ui::truncate_path;
///
/// let short = "/home/user/file.txt";
/// assert_eq!(truncate_path(short, 50), short);
///
/// let long = "/very/long/path/to/some/deeply/nested/file.txt";
/// let truncated = truncate_path(long, 30);
/// assert!(truncated.ends_with("file.txt"));
/// assert!(truncated.contains("..."));
/// ```
#[must_use]
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        return path.to_string();
    }
    if max_len <= 6 {
        return truncate_string(path, max_len);
    }

    let filename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let filename_len = filename.chars().count();
    if filename_len + 4 <= max_len {
        let head: String = path.chars().take(max_len - filename_len - 4).collect();
        return format!("{}.../{}", head, filename);
    }

    truncate_string(path, max_len)
}

/// Create a centered rectangle with given percentage of parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
