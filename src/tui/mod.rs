//! Terminal User Interface module.
//!
//! This module provides the interactive TUI for reviewing groups and
//! removing the extras, using ratatui with the crossterm backend.
//!
//! # Overview
//!
//! - [`app`]: Application state (modes, navigation, selection, settings)
//! - [`events`]: Keyboard event handling
//! - [`keybindings`]: Review-screen key map
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal setup, scan worker and the main loop
//! - [`theme`]: Color palettes
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions
//! 3. Actions modify the App state
//! 4. The UI renders based on the current App state
//!
//! # Example
//!
//! ```
//! use simdupe::actions::DeleteMode;
//! use simdupe::duplicates::{Group, Item, ScanMode};
//! use simdupe::tui::{Action, App};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let mut app = App::new(PathBuf::from("."), ScanMode::default(), DeleteMode::Trash);
//! let t = SystemTime::UNIX_EPOCH;
//! app.finish_scan(
//!     vec![Group::new(
//!         "MATCH: a.txt",
//!         vec![
//!             Item::new(PathBuf::from("/x/a.txt"), 1, t),
//!             Item::new(PathBuf::from("/y/a.txt"), 1, t),
//!         ],
//!     )],
//!     None,
//! );
//!
//! app.handle_action(Action::KeepOldest);
//! assert_eq!(app.aggregate().total_selected_items, 1);
//! ```

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{Action, App, AppMode, Prompt};
pub use events::{EventError, EventHandler};
pub use run::{run_tui, spawn_scan, ScanMessage, TuiError};
pub use theme::Theme;
pub use ui::{format_size, render, truncate_path, truncate_string};
