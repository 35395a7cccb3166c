//! Exit codes and structured error output.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: normal exit
/// - 1: the root path is invalid, or the terminal failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Normal exit.
    Success,
    /// The root path is missing, not a directory, or unreadable.
    InvalidRoot,
    /// Any other failure (terminal I/O, serialization).
    RuntimeError,
}

impl ExitCode {
    /// Numeric process exit code. Every failure exits with 1.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidRoot | Self::RuntimeError => 1,
        }
    }

    /// Machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SD000",
            Self::InvalidRoot => "SD001",
            Self::RuntimeError => "SD002",
        }
    }

    /// Classify a top-level error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err
            .downcast_ref::<crate::duplicates::FinderError>()
            .is_some()
            || err.downcast_ref::<crate::scanner::ScanError>().is_some()
        {
            Self::InvalidRoot
        } else {
            Self::RuntimeError
        }
    }
}

/// Error report printed with `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SD001")
    pub code: String,
    /// The process exit code
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Build a report from an error and its exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
