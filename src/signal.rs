//! Ctrl+C handling for non-interactive scans.
//!
//! The handler raises a shared `AtomicBool` that the [`Finder`] polls at
//! directory boundaries and between hash buckets. A cancelled scan simply
//! returns no groups.
//!
//! ```rust,no_run
//! use simdupe::duplicates::FinderConfig;
//! use simdupe::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_cancel_flag(handler.get_flag());
//! ```
//!
//! [`Finder`]: crate::duplicates::Finder

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared cancellation flag raised by Ctrl+C.
#[derive(Debug, Clone, Default)]
pub struct CancelHandler {
    flag: Arc<AtomicBool>,
}

impl CancelHandler {
    /// Create a handler with the flag lowered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag.
    pub fn request_cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Lower the flag so the handler can guard another scan.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// A clone of the flag for the finder or a worker thread.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<CancelHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse it if already installed.
///
/// The returned handler has its flag lowered.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] when another Ctrl+C handler was
/// registered outside this module.
pub fn install_handler() -> Result<CancelHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = CancelHandler::new();
    let flag = handler.get_flag();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted, cancelling scan...");
        let _ = std::io::stderr().flush();
        log::info!("Cancel signal received");
    })?;

    let _ = GLOBAL_HANDLER.set(handler.clone());
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_handler_new() {
        let handler = CancelHandler::new();
        assert!(!handler.is_cancel_requested());
    }

    #[test]
    fn test_request_and_reset() {
        let handler = CancelHandler::new();
        handler.request_cancel();
        assert!(handler.is_cancel_requested());
        handler.reset();
        assert!(!handler.is_cancel_requested());
    }

    #[test]
    fn test_get_flag_shares_state() {
        let handler = CancelHandler::new();
        let flag = handler.get_flag();
        handler.request_cancel();
        assert!(flag.load(Ordering::SeqCst));

        let cloned = handler.clone();
        handler.reset();
        assert!(!cloned.is_cancel_requested());
    }

    #[test]
    fn test_cancel_handler_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CancelHandler>();
    }
}
