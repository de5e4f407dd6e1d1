//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest-keyed grouping of file records
//! - Multi-root scanning with root deduplication
//! - Scan summaries and error collection

pub mod finder;
pub mod groups;

pub use finder::{
    unique_roots, DuplicateGrouper, FinderError, GrouperConfig, ScanReport, ScanSummary,
};
pub use groups::{group_by_digest, DuplicateGroup, DuplicateGroups, GroupingStats};
