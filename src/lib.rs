//! simdupe - Duplicate & Similar-File Finder
//!
//! Walks a directory tree, groups files that are duplicates (by name, size or
//! content hash) or versions and numbered sequences of one another, and lets
//! the user review, select and remove the extras from an interactive TUI.
//!
//! # Example
//!
//! ```no_run
//! use simdupe::duplicates::{Finder, FinderConfig, GroupListExt, ScanMode};
//! use std::path::Path;
//!
//! let finder = Finder::new(FinderConfig::default().with_mode(ScanMode::Smart));
//! let mut groups = finder.scan(Path::new(".")).unwrap();
//! groups.keep_newest();
//! for group in &groups {
//!     println!("{} ({} files)", group.name(), group.len());
//! }
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod tui;
pub mod view;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, OutputFormat};
use config::Config;
use duplicates::{Finder, FinderConfig, ScanMode};
use error::ExitCode;
use output::JsonOutput;
use progress::Progress;
use signal::CancelHandler;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the root is not a readable directory, the terminal
/// fails, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let interactive = cli.output == OutputFormat::Tui;
    logging::init_logging(cli.verbose, cli.quiet, interactive);

    let config = Config::load(cli.config.as_deref());
    let mode = config.resolve_scan_mode(&cli);
    let root = scanner::validate_root(&cli.root())?;
    log::info!("simdupe {} starting in {} mode", env!("CARGO_PKG_VERSION"), mode.label());

    match cli.output {
        OutputFormat::Json => run_json(&root, mode, cli.quiet),
        OutputFormat::Tui => {
            let theme = tui::Theme::from_choice(config.theme);
            let mut app = tui::App::new(root, mode, config.delete_mode).with_theme(theme);
            tui::run_tui(&mut app).context("terminal user interface failed")?;
            Ok(ExitCode::Success)
        }
    }
}

/// One scan, printed as JSON on stdout.
fn run_json(root: &std::path::Path, mode: ScanMode, quiet: bool) -> anyhow::Result<ExitCode> {
    let handler = signal::install_handler().unwrap_or_else(|e| {
        log::warn!("{}, Ctrl+C will not cancel the scan", e);
        CancelHandler::new()
    });

    let show_progress = !quiet && std::io::stderr().is_terminal();
    let progress = Arc::new(Progress::new(!show_progress));
    let finder = Finder::new(
        FinderConfig::default()
            .with_mode(mode)
            .with_cancel_flag(handler.get_flag())
            .with_progress_callback(progress.clone()),
    );

    let report = JsonOutput::from_scan(&finder, root)?;
    progress.finish();

    if handler.is_cancel_requested() {
        log::warn!("Scan cancelled, reporting no groups");
    }

    let stdout = std::io::stdout();
    report
        .write_to(&mut stdout.lock(), true)
        .context("failed to write JSON report")?;

    Ok(ExitCode::Success)
}
