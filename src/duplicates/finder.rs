//! Duplicate grouper driving one walker per root.
//!
//! # Overview
//!
//! [`DuplicateGrouper::scan`] runs the whole pipeline:
//! 1. **Roots** - expand `~`, normalize and deduplicate the requested roots
//! 2. **Walk** - drain one [`TreeWalker`] per root, in order, through the
//!    shared digester
//! 3. **Group** - bucket every record by digest and keep groups of 2+
//!
//! Roots are scanned one after the other on the calling thread. A root that
//! is missing or not a directory is recorded in the summary and the next
//! root is scanned. Per-file errors are recorded and skipped the same way,
//! unless [`GrouperConfig::strict`] is set, in which case the first error
//! aborts the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::duplicates::{DuplicateGrouper, GrouperConfig};
//! use dupewalk::scanner::ContentHasher;
//!
//! let hasher = ContentHasher::new();
//! let grouper = DuplicateGrouper::new(&hasher, GrouperConfig::default());
//! let report = grouper.scan(["~/Pictures", "/mnt/backup"]).unwrap();
//!
//! for group in &report.groups {
//!     println!("{}", group.digest);
//!     for file in &group.files {
//!         println!("  {}", file.path.display());
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::groups::DuplicateGroups;
use crate::scanner::path_utils::{identity_of, identity_under, resolve_root};
use crate::scanner::{Digester, ScanError, TreeWalker};

/// Configuration for a scan.
#[derive(Debug, Clone, Default)]
pub struct GrouperConfig {
    /// Abort on the first scan error instead of recording it.
    pub strict: bool,
}

impl GrouperConfig {
    /// Set strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Summary of a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Roots that were scanned, after deduplication
    pub roots: Vec<PathBuf>,
    /// Total number of files recorded
    pub total_files: usize,
    /// Total size of all recorded files in bytes
    pub total_size: u64,
    /// Number of distinct digests
    pub unique_digests: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of files in duplicate groups
    pub duplicate_files: usize,
    /// Bytes held by every copy but the first in each group
    pub reclaimable_space: u64,
    /// Files reached again through an overlapping root and skipped
    pub repeated_paths: usize,
    /// Errors recorded while scanning
    pub scan_errors: Vec<ScanError>,
    /// Wall time of the whole scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any errors were recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty()
    }

    /// Human-readable reclaimable space.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Human-readable total size.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Result of [`DuplicateGrouper::scan`].
#[derive(Debug)]
pub struct ScanReport {
    /// Duplicate sets, keyed by digest
    pub groups: DuplicateGroups,
    /// Statistics and recorded errors
    pub summary: ScanSummary,
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A scan error occurred in strict mode.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Groups files from one or more roots by content digest.
pub struct DuplicateGrouper<'h> {
    config: GrouperConfig,
    hasher: &'h dyn Digester,
}

impl<'h> DuplicateGrouper<'h> {
    /// Create a grouper that digests files through `hasher`.
    pub fn new(hasher: &'h dyn Digester, config: GrouperConfig) -> Self {
        Self { config, hasher }
    }

    /// Create a grouper with default configuration.
    pub fn with_defaults(hasher: &'h dyn Digester) -> Self {
        Self::new(hasher, GrouperConfig::default())
    }

    /// Scan `roots` and return the duplicate sets.
    ///
    /// Duplicate roots are scanned once; an empty list scans `.`.
    ///
    /// # Errors
    ///
    /// Only in strict mode: returns [`FinderError::Scan`] with the first
    /// error met. Otherwise errors are collected in
    /// [`ScanSummary::scan_errors`].
    pub fn scan<I, P>(&self, roots: I) -> Result<ScanReport, FinderError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let start_time = Instant::now();
        let roots = unique_roots(roots);
        log::info!(
            "Scanning dirs: {}",
            roots
                .iter()
                .map(|r| format!("{:?}", r.display().to_string()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut summary = ScanSummary::default();
        let mut accumulator = DuplicateGroups::new();
        let mut seen_paths = HashSet::new();

        for root in &roots {
            let mut walker = TreeWalker::open(root, self.hasher);
            let root_identity = identity_of(walker.root());
            let outcome = self.drain(
                &mut walker,
                &root_identity,
                &mut accumulator,
                &mut seen_paths,
                &mut summary,
            );
            walker.close();
            outcome?;
        }

        let (groups, stats) = accumulator.into_duplicates();

        summary.roots = roots;
        summary.total_files = stats.total_files;
        summary.total_size = stats.total_size;
        summary.unique_digests = stats.unique_digests;
        summary.duplicate_groups = stats.duplicate_groups;
        summary.duplicate_files = stats.duplicate_files;
        summary.reclaimable_space = groups.iter().map(|g| g.wasted_space()).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Found {} duplicate group(s) among {} file(s) in {:?}",
            summary.duplicate_groups,
            summary.total_files,
            summary.scan_duration
        );
        if summary.has_errors() {
            log::warn!(
                "{} error(s) while scanning; affected paths were skipped",
                summary.scan_errors.len()
            );
        }

        Ok(ScanReport { groups, summary })
    }

    /// Move every record of one walker into the accumulator.
    ///
    /// Files are recognized across roots by their resolved location, so a
    /// file reached through two spellings of one directory counts once.
    fn drain(
        &self,
        walker: &mut TreeWalker<'_>,
        root_identity: &Path,
        accumulator: &mut DuplicateGroups,
        seen_paths: &mut HashSet<PathBuf>,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        let root = walker.root().to_path_buf();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if !seen_paths.insert(identity_under(&root, root_identity, &file.path)) {
                        log::debug!("Already scanned via another root: {}", file.path.display());
                        summary.repeated_paths += 1;
                        continue;
                    }
                    log::trace!("count={} {:?}", seen_paths.len(), file);
                    accumulator.insert(file);
                }
                Err(e) => {
                    if self.config.strict {
                        log::error!("Aborting scan: {}", e);
                        return Err(FinderError::Scan(e));
                    }
                    summary.scan_errors.push(e);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for DuplicateGrouper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateGrouper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Resolve and deduplicate roots, keeping first-occurrence order.
///
/// Two roots are the same when they resolve to the same directory on disk;
/// roots that cannot be resolved are compared as written. The first
/// spelling is kept. Empty entries are ignored. If nothing remains, `.` is returned.
#[must_use]
pub fn unique_roots<I, P>(roots: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            continue;
        }
        let resolved = resolve_root(root);
        if seen.insert(identity_of(&resolved)) {
            unique.push(resolved);
        } else {
            log::debug!("Ignoring repeated root: {}", root.display());
        }
    }

    if unique.is_empty() {
        unique.push(PathBuf::from("."));
    }
    unique
}
