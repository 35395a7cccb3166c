//! TUI main loop.
//!
//! This module provides the main entry point for running the interactive TUI.
//! It handles terminal setup, the event loop, and cleanup on exit.
//!
//! # Terminal Management
//!
//! The TUI takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Scans
//!
//! Scans run on a worker thread. Status lines and the finished group list
//! come back over an `mpsc` channel, so the group list is handed to the UI
//! thread by ownership transfer. Raw mode turns Ctrl+C into a key press,
//! which the app maps to the scan's cancellation flag.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::actions::DeleteMode;
//! use simdupe::duplicates::ScanMode;
//! use simdupe::tui::{run_tui, App};
//! use std::path::PathBuf;
//!
//! let mut app = App::new(PathBuf::from("."), ScanMode::Smart, DeleteMode::Trash);
//! if let Err(e) = run_tui(&mut app) {
//!     eprintln!("TUI error: {}", e);
//! }
//! ```

use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use thiserror::Error;

use super::app::{Action, App, AppMode};
use super::events::EventHandler;
use super::ui::render;
use crate::actions;
use crate::duplicates::{Finder, FinderConfig, Group, ScanMode};
use crate::progress::StatusCallback;
use crate::scanner::HashBackend;

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: Use the frame duration for responsive rendering.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Messages from the scan worker to the UI thread.
#[derive(Debug)]
pub enum ScanMessage {
    /// A status line from the finder
    Status(String),
    /// The scan completed (possibly cancelled, with no groups)
    Finished {
        /// The scan result
        groups: Vec<Group>,
        /// Hash backend name when hashing ran
        backend: Option<&'static str>,
    },
    /// The root could not be scanned
    Failed(String),
}

/// Run a scan on a worker thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_scan(
    root: PathBuf,
    mode: ScanMode,
    cancel_flag: Arc<AtomicBool>,
) -> io::Result<Receiver<ScanMessage>> {
    let (tx, rx) = mpsc::channel();

    let status_tx = tx.clone();
    let callback: Arc<dyn StatusCallback> = Arc::new(move |message: &str| {
        let _ = status_tx.send(ScanMessage::Status(message.to_string()));
    });
    let config = FinderConfig::default()
        .with_mode(mode)
        .with_cancel_flag(cancel_flag)
        .with_progress_callback(callback);

    thread::Builder::new()
        .name("simdupe-scan".to_string())
        .spawn(move || {
            let finder = Finder::new(config);
            let backend = finder.backend().map(HashBackend::name);
            let message = match finder.scan(&root) {
                Ok(groups) => ScanMessage::Finished { groups, backend },
                Err(e) => ScanMessage::Failed(e.to_string()),
            };
            // The UI may already be gone
            let _ = tx.send(message);
        })?;

    Ok(rx)
}

fn start_scan(app: &mut App) -> io::Result<Receiver<ScanMessage>> {
    let cancel_flag = Arc::new(AtomicBool::new(false));
    log::info!(
        "Scanning {} ({})",
        app.root().display(),
        app.scan_mode().label()
    );
    let rx = spawn_scan(app.root().to_path_buf(), app.scan_mode(), Arc::clone(&cancel_flag))?;
    app.begin_scan(cancel_flag);
    Ok(rx)
}

/// Apply pending worker messages. Returns true once the scan is over.
fn drain_scan(app: &mut App, rx: &Receiver<ScanMessage>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(ScanMessage::Status(status)) => app.set_status(&status),
            Ok(ScanMessage::Finished { groups, backend }) => {
                app.finish_scan(groups, backend);
                return true;
            }
            Ok(ScanMessage::Failed(error)) => {
                log::warn!("Scan failed: {}", error);
                app.fail_scan(error);
                return true;
            }
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                app.fail_scan("Scan worker stopped unexpectedly".to_string());
                return true;
            }
        }
    }
}

/// Run the interactive TUI.
///
/// Starts the first scan immediately and runs until the user quits.
/// The terminal is always restored to its original state, even on error or
/// panic.
///
/// # Errors
///
/// Returns `TuiError::Io` for terminal I/O errors.
/// Returns `TuiError::Event` for event handling errors.
pub fn run_tui(app: &mut App) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let result = setup_terminal().and_then(|mut terminal| run_loop(&mut terminal, app));
    restore_terminal();

    let _ = panic::take_hook();
    result
}

fn run_loop(terminal: &mut Terminal, app: &mut App) -> TuiResult<()> {
    let event_handler = EventHandler::new();
    let mut scan = Some(start_scan(app)?);
    let mut last_render = Instant::now();

    loop {
        if scan.as_ref().is_some_and(|rx| drain_scan(app, rx)) {
            scan = None;
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        if scan.is_none() && app.take_rescan_request() {
            scan = Some(start_scan(app)?);
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.next_action(POLL_TIMEOUT, app.mode())? {
            handle_action(app, action);
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    log::info!("TUI exited normally");
    Ok(())
}

/// Handle a user action, running the deletion when it is confirmed.
fn handle_action(app: &mut App, action: Action) {
    let mode = app.mode();
    if app.handle_action(action) {
        return;
    }

    if action == Action::Confirm && mode == AppMode::Confirming {
        let report = actions::execute(app.groups(), app.delete_mode());
        app.finish_execute(report);
    } else {
        log::trace!("Action not handled: {:?}", action);
    }
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    log::debug!("Terminal setup complete");
    Ok(terminal)
}

/// Restore the terminal to its original state. Best effort.
fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    log::debug!("Terminal restored");
}
