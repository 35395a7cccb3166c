//! File actions module.
//!
//! The delete module applies the user's selection:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (after explicit confirmation in the UI)
//! - Batch execution that reports every failure without stopping
//!
//! ```no_run
//! use simdupe::actions::delete::delete_to_trash;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = delete_to_trash(&path);
//! ```

pub mod delete;

pub use delete::{
    delete_file, delete_to_trash, execute, execute_paths, permanent_delete, trash_available,
    DeleteError, DeleteMode, ExecuteReport,
};
