//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text, the digest-then-paths listing for terminals
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::duplicates::DuplicateGrouper;
//! use dupewalk::output::TextOutput;
//! use dupewalk::scanner::ContentHasher;
//!
//! let hasher = ContentHasher::new();
//! let report = DuplicateGrouper::with_defaults(&hasher).scan(["."]).unwrap();
//!
//! print!("{}", TextOutput::new(&report.groups, false).render());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::JsonOutput;
pub use text::{render_summary, TextOutput};
