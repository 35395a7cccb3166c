//! Grouping engine.
//!
//! This module provides functionality for:
//! - Simple-mode grouping by name, size and content hash
//! - Smart-mode grouping of versions and numbered sequences
//! - The group model with per-item selection state
//! - Scan orchestration with status reporting and cancellation

pub mod finder;
pub mod groups;
pub mod simple;
pub mod smart;

pub use finder::{Finder, FinderConfig, FinderError, ScanMode};
pub use groups::{Badge, Group, GroupListExt, Item};
pub use simple::{default_hash_workers, pre_bucket, Criteria, SimpleGrouper, MAX_HASH_WORKERS};
pub use smart::{group_smart, split_name, Candidates};
