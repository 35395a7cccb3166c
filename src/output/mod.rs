//! Non-interactive output formats.
//!
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use simdupe::duplicates::Finder;
//! use simdupe::output::JsonOutput;
//! use std::path::Path;
//! use std::time::Instant;
//!
//! let finder = Finder::with_defaults();
//! let start = Instant::now();
//! let groups = finder.scan(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &finder.config().mode, finder.backend(), start.elapsed());
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;

pub use json::{JsonOutput, JsonOutputError};
