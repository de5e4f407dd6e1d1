//! Digest grouping of file records.
//!
//! # Overview
//!
//! Records are bucketed by their content digest. Groups keep the order in
//! which their digest was first seen, and records inside a group keep the
//! order they were inserted (walk order). Only groups with two or more
//! members are duplicate sets; singletons are dropped by
//! [`DuplicateGroups::into_duplicates`].
//!
//! The grouping key is the digest alone. Two records with equal digests
//! but different sizes would share a group; see
//! [`FileRecord::is_same_content`] for the stricter comparison.
//!
//! # Example
//!
//! ```
//! use dupewalk::duplicates::group_by_digest;
//! use dupewalk::scanner::hasher::digest_bytes;
//! use dupewalk::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let now = SystemTime::now();
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/a.txt"), 5, now, digest_bytes(b"hello")),
//!     FileRecord::new(PathBuf::from("/b.txt"), 5, now, digest_bytes(b"hello")),
//!     FileRecord::new(PathBuf::from("/c.txt"), 5, now, digest_bytes(b"world")),
//! ];
//!
//! let (groups, stats) = group_by_digest(files);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{Digest, FileRecord};

/// Records sharing one digest, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file in the group
    pub digest: Digest,
    /// Files with this digest, in walk order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create an empty group for `digest`.
    #[must_use]
    pub fn new(digest: Digest) -> Self {
        Self {
            digest,
            files: Vec::new(),
        }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if the file digest doesn't match the group.
    pub fn add(&mut self, file: FileRecord) {
        debug_assert_eq!(
            file.digest, self.digest,
            "File digest {} doesn't match group digest {}",
            file.digest, self.digest
        );
        self.files.push(file);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group is a duplicate set (2+ files).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.files.len() > 1
    }

    /// Size of the first file in the group.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files.first().map_or(0, |f| f.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space taken by every copy but the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.total_size().saturating_sub(self.size())
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Ordered mapping from digest to [`DuplicateGroup`].
///
/// Used both as the accumulator during a scan and as the filtered result.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
    index: HashMap<Digest, usize>,
}

impl DuplicateGroups {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the group of its digest, creating it if needed.
    pub fn insert(&mut self, file: FileRecord) {
        let slot = match self.index.get(&file.digest) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(DuplicateGroup::new(file.digest));
                self.index.insert(file.digest, slot);
                slot
            }
        };
        self.groups[slot].add(file);
    }

    /// Group for `digest`, if any.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&DuplicateGroup> {
        self.index.get(digest).map(|&slot| &self.groups[slot])
    }

    /// Whether a group exists for `digest`.
    #[must_use]
    pub fn contains(&self, digest: &Digest) -> bool {
        self.index.contains_key(digest)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Digests in first-seen order.
    pub fn digests(&self) -> impl Iterator<Item = &Digest> + '_ {
        self.groups.iter().map(|g| &g.digest)
    }

    /// Total number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Keep only duplicate sets, returning them with grouping statistics.
    #[must_use]
    pub fn into_duplicates(self) -> (DuplicateGroups, GroupingStats) {
        let mut stats = GroupingStats {
            unique_digests: self.groups.len(),
            ..GroupingStats::default()
        };

        let mut filtered = DuplicateGroups::new();
        for group in self.groups {
            stats.total_files += group.len();
            stats.total_size += group.total_size();

            if group.is_duplicate() {
                stats.duplicate_files += group.len();
                stats.duplicate_groups += 1;
                log::debug!("Digest {}: {} duplicates", group.digest, group.len());
                filtered.index.insert(group.digest, filtered.groups.len());
                filtered.groups.push(group);
            } else {
                stats.eliminated_unique += group.len();
                if let Some(file) = group.files.first() {
                    log::trace!("Unique digest {}: {}", group.digest, file.path.display());
                }
            }
        }

        (filtered, stats)
    }
}

impl IntoIterator for DuplicateGroups {
    type Item = DuplicateGroup;
    type IntoIter = std::vec::IntoIter<DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl FromIterator<FileRecord> for DuplicateGroups {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut groups = Self::new();
        for file in iter {
            groups.insert(file);
        }
        groups
    }
}

/// Statistics from digest grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct digests
    pub unique_digests: usize,
    /// Number of files in groups of 2+
    pub duplicate_files: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of groups with 2+ files
    pub duplicate_groups: usize,
}

/// Group records by digest and keep the duplicate sets.
#[must_use]
pub fn group_by_digest(
    files: impl IntoIterator<Item = FileRecord>,
) -> (DuplicateGroups, GroupingStats) {
    files.into_iter().collect::<DuplicateGroups>().into_duplicates()
}
