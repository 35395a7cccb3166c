//! Status reporting for scans.
//!
//! A scan talks to its caller through a single [`StatusCallback`] that
//! receives human-readable status lines:
//!
//! | When | Message |
//! |------|---------|
//! | walk starts | `Indexing...` |
//! | every 10,000 files | `Indexing: N files` |
//! | grouping starts | `Analyzing...` |
//! | each completed hash bucket | `Hashing: N/M` |
//! | scan finished | `Ready` or `Ready (xxHash64)` |
//!
//! The [`Progress`] struct renders those lines with an indicatif spinner
//! for non-interactive output modes.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Receiver for scan status messages.
///
/// Called from the scanning thread and, during hashing, from pool workers,
/// so implementations must be thread-safe. Invocations are unordered.
pub trait StatusCallback: Send + Sync {
    /// Called with a new status line.
    fn on_status(&self, message: &str);
}

impl<F> StatusCallback for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_status(&self, message: &str) {
        self(message);
    }
}

/// Status line emitted when indexing begins.
#[must_use]
pub fn indexing_started_message() -> String {
    "Indexing...".to_string()
}

/// Status line emitted periodically while indexing.
#[must_use]
pub fn indexing_message(count: usize) -> String {
    format!("Indexing: {} files", count)
}

/// Status line emitted when grouping begins.
#[must_use]
pub fn analyzing_message() -> String {
    "Analyzing...".to_string()
}

/// Status line emitted after each hash bucket.
#[must_use]
pub fn hashing_message(done: usize, total: usize) -> String {
    format!("Hashing: {}/{}", done, total)
}

/// Final status line. Names the hash backend when hashing was enabled.
#[must_use]
pub fn ready_message(backend: Option<&str>) -> String {
    match backend {
        Some(name) => format!("Ready ({})", name),
        None => "Ready".to_string(),
    }
}

/// Spinner-based status reporter using indicatif.
pub struct Progress {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use simdupe::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Stop the spinner, leaving the last message on screen.
    pub fn finish(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(pb) = guard.take() {
                pb.finish();
            }
        }
    }
}

impl StatusCallback for Progress {
    fn on_status(&self, message: &str) {
        if self.quiet {
            return;
        }

        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_message(message.to_string());
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_messages() {
        assert_eq!(indexing_message(10_000), "Indexing: 10000 files");
        assert_eq!(hashing_message(3, 7), "Hashing: 3/7");
        assert_eq!(ready_message(Some("xxHash64")), "Ready (xxHash64)");
        assert_eq!(ready_message(None), "Ready");
    }

    #[test]
    fn test_closure_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |msg: &str| sink.lock().unwrap().push(msg.to_string());

        callback.on_status("one");
        callback.on_status("two");

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_quiet_progress_does_nothing() {
        let progress = Progress::new(true);
        progress.on_status("hidden");
        assert!(progress.spinner.lock().unwrap().is_none());
    }
}
