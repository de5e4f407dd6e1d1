//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "digest": "5d41402abc4b2a76b9719d911017c592",
//!       "size": 5,
//!       "files": [
//!         { "path": "/tmp/a.txt", "size": 5, "modified": "2024-01-01T00:00:00Z" },
//!         { "path": "/tmp/b.txt", "size": 5, "modified": "2024-01-01T00:00:00Z" }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "roots": ["/tmp"],
//!     "total_files": 3,
//!     "total_size": 15,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "reclaimable_space": 5,
//!     "scan_errors": [],
//!     "scan_duration_ms": 2,
//!     "exit_code": 0,
//!     "exit_code_name": "DW000"
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, DuplicateGroups, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::FileRecord;

/// One file in a JSON duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as scanned
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time (RFC 3339)
    pub modified: DateTime<Utc>,
}

impl JsonFile {
    /// Convert a scanned record.
    #[must_use]
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size,
            modified: DateTime::<Utc>::from(record.modified),
        }
    }
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// MD5 digest as hexadecimal string (32 characters)
    pub digest: String,
    /// Size of the first file in bytes
    pub size: u64,
    /// Files in walk order
    pub files: Vec<JsonFile>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            digest: group.digest.to_hex(),
            size: group.size(),
            files: group.files.iter().map(JsonFile::from_record).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Roots that were scanned
    pub roots: Vec<String>,
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of files in duplicate groups
    pub duplicate_files: usize,
    /// Space held by every copy but the first (bytes)
    pub reclaimable_space: u64,
    /// Messages of errors recorded during the scan
    pub scan_errors: Vec<String>,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DW000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            roots: summary
                .roots
                .iter()
                .map(|r| r.to_string_lossy().into_owned())
                .collect(),
            total_files: summary.total_files,
            total_size: summary.total_size,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_errors: summary.scan_errors.iter().map(ToString::to_string).collect(),
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    #[must_use]
    pub fn new(groups: &DuplicateGroups, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
