//! Directory walker producing [`FileRecord`]s.
//!
//! # Overview
//!
//! [`TreeWalker`] enumerates every regular file under one root using
//! [`walkdir`], single threaded and depth first. Directories are visited
//! pre-order and siblings come in the order the filesystem lists them; no
//! sorting is applied. Each regular file is stat'd and digested through the
//! shared [`Digester`] before its record is yielded.
//!
//! # Entry policy
//!
//! - Directories are never yielded.
//! - Symbolic links are not followed and are skipped.
//! - Sockets, FIFOs and device files are skipped.
//! - A failure to stat or digest one entry is yielded as an `Err` item and
//!   the walk moves on. No record is produced for that entry.
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::scanner::{ContentHasher, TreeWalker};
//!
//! let hasher = ContentHasher::new();
//! let mut walker = TreeWalker::open(".", &hasher);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! walker.close();
//! ```

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use walkdir::WalkDir;

use super::hasher::Digester;
use super::path_utils::expand_home;
use super::{FileRecord, HashError, ScanError};

/// Walker over a single root directory.
///
/// Opened with [`TreeWalker::open`] and released with
/// [`TreeWalker::close`]. Closing holds no real resource today; dropping
/// the walker releases it as well, so early returns are covered.
pub struct TreeWalker<'h> {
    /// Root directory, with `~` already expanded
    root: PathBuf,
    /// Shared digest source
    hasher: &'h dyn Digester,
    /// Whether [`walk`](Self::walk) has been called
    walked: bool,
    closed: bool,
}

impl<'h> TreeWalker<'h> {
    /// Open a walker for `root`.
    ///
    /// A leading `~` is expanded immediately. The root is not checked here;
    /// a missing root surfaces as the first item of [`walk`](Self::walk).
    pub fn open(root: impl AsRef<Path>, hasher: &'h dyn Digester) -> Self {
        let root = expand_home(root.as_ref());
        log::trace!("Opened walker for {}", root.display());
        Self {
            root,
            hasher,
            walked: false,
            closed: false,
        }
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, yielding one record per regular file.
    ///
    /// The sequence is lazy and can be taken once. Calling `walk` again on
    /// the same walker yields nothing; open a new walker to rescan.
    pub fn walk(&mut self) -> Walk<'h> {
        if self.walked {
            log::warn!(
                "Walker for {} was already iterated; open a new one to rescan",
                self.root.display()
            );
            return Walk::exhausted(self.root.clone(), self.hasher);
        }
        self.walked = true;
        Walk::new(self.root.clone(), self.hasher)
    }

    /// Release the walker.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            log::trace!("Closed walker for {}", self.root.display());
        }
    }
}

impl Drop for TreeWalker<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for TreeWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("root", &self.root)
            .field("walked", &self.walked)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Lazy sequence of records produced by [`TreeWalker::walk`].
pub struct Walk<'h> {
    root: PathBuf,
    hasher: &'h dyn Digester,
    inner: Option<walkdir::IntoIter>,
    started: Instant,
    files: usize,
    errors: usize,
}

impl<'h> Walk<'h> {
    fn new(root: PathBuf, hasher: &'h dyn Digester) -> Self {
        log::debug!("Starting walk: {}", root.display());
        let inner = WalkDir::new(&root).follow_links(false).into_iter();
        Self {
            root,
            hasher,
            inner: Some(inner),
            started: Instant::now(),
            files: 0,
            errors: 0,
        }
    }

    fn exhausted(root: PathBuf, hasher: &'h dyn Digester) -> Self {
        Self {
            root,
            hasher,
            inner: None,
            started: Instant::now(),
            files: 0,
            errors: 0,
        }
    }

    /// Number of records yielded so far.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files
    }

    /// Number of errors yielded so far.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors
    }

    fn finish(&mut self) {
        if self.inner.take().is_some() {
            log::info!(
                "Scanned {} in {:?} ({} files, {} errors)",
                self.root.display(),
                self.started.elapsed(),
                self.files,
                self.errors
            );
        }
    }

    /// Handle one directory entry. `None` means the entry is skipped.
    fn process_entry(&self, entry: &walkdir::DirEntry) -> Option<Result<FileRecord, ScanError>> {
        let path = entry.path();
        let file_type = entry.file_type();

        if entry.depth() == 0 {
            if file_type.is_dir() {
                return None;
            }
            // The root exists but cannot be walked as a tree.
            return Some(Err(ScanError::NotADirectory(path.to_path_buf())));
        }

        if file_type.is_dir() {
            log::trace!("Entering directory: {}", path.display());
            return None;
        }

        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", path.display());
            return None;
        }

        if !file_type.is_file() {
            log::debug!("Skipping special file: {}", path.display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.map_walk_error(e))),
        };
        let modified = match modified_time(path, metadata.modified()) {
            Ok(t) => t,
            Err(e) => return Some(Err(e)),
        };

        let digest = match self.hasher.digest_of(path) {
            Ok(d) => d,
            Err(HashError::NotAFile(p)) => {
                // Replaced by something else since it was listed.
                log::debug!("No longer a regular file: {}", p.display());
                return Some(Err(ScanError::NotAFile(p)));
            }
            Err(e) => {
                log::warn!("Could not digest {}: {}", path.display(), e);
                return Some(Err(ScanError::Hash(e)));
            }
        };

        let record = FileRecord::new(path.to_path_buf(), metadata.len(), modified, digest);
        log::debug!("{} {} ({} bytes)", record.digest, path.display(), record.size);
        Some(Ok(record))
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn map_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.into_io_error() {
            Some(io) => {
                let err = ScanError::from_io(path, io);
                match err {
                    ScanError::NotFound(ref p) => {
                        log::debug!("Path not found (may have been deleted): {}", p.display());
                    }
                    _ => log::warn!("{}", err),
                }
                err
            }
            None => {
                log::warn!("Walker error for {}", path.display());
                ScanError::Io {
                    path,
                    source: std::io::Error::other("filesystem loop detected"),
                }
            }
        }
    }
}

/// Modification time of a listed file, or the error that hid it.
fn modified_time(
    path: &Path,
    modified: std::io::Result<SystemTime>,
) -> Result<SystemTime, ScanError> {
    modified.map_err(|e| {
        log::warn!("No modification time for {}: {}", path.display(), e);
        ScanError::from_io(path.to_path_buf(), e)
    })
}

impl Iterator for Walk<'_> {
    type Item = Result<FileRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.inner.as_mut()?.next();
            let entry = match next {
                None => {
                    self.finish();
                    return None;
                }
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    let root_failed = e.depth() == 0;
                    let err = self.map_walk_error(e);
                    self.errors += 1;
                    if root_failed {
                        self.finish();
                    }
                    return Some(Err(err));
                }
            };

            let Some(result) = self.process_entry(&entry) else {
                continue;
            };

            match &result {
                Ok(_) => self.files += 1,
                Err(ScanError::NotADirectory(_)) => {
                    self.errors += 1;
                    self.finish();
                }
                Err(_) => self.errors += 1,
            }
            return Some(result);
        }
    }
}
