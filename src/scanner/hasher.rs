//! Memoizing MD5 content hasher.
//!
//! # Overview
//! [`ContentHasher`] computes a 128-bit digest of a file's contents the
//! first time a path is requested and answers every later request for the
//! same path from its memo table. The table is never invalidated: if a file
//! changes after it was hashed, the stale digest is returned.
//!
//! One hasher is created per run and lent to every walker, so a path is
//! read at most once no matter how many roots reach it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use md5::{Digest as _, Md5};

use super::{Digest, HashError, DIGEST_LEN};

/// Read buffer size for streaming file contents into the digest.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Source of content digests keyed by path.
///
/// [`ContentHasher`] is the production implementation. Walkers and the
/// grouper only depend on this trait so tests can count or fake lookups.
pub trait Digester {
    /// Digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read, or is not
    /// a regular file.
    fn digest_of(&self, path: &Path) -> Result<Digest, HashError>;
}

/// Content hasher with a per-run memo table.
///
/// Single threaded: the memo table sits in a `RefCell`, so the hasher is
/// not `Sync` and cannot be shared across threads as is.
#[derive(Debug, Default)]
pub struct ContentHasher {
    cache: RefCell<HashMap<PathBuf, Digest>>,
    files_read: Cell<u64>,
    cache_hits: Cell<u64>,
}

impl ContentHasher {
    /// Create a hasher with an empty memo table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files actually opened and read.
    #[must_use]
    pub fn files_read(&self) -> u64 {
        self.files_read.get()
    }

    /// Number of lookups answered from the memo table.
    #[must_use]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.get()
    }

    /// Number of memoized paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether no path has been hashed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Cached digest for `path`, if it was hashed before.
    #[must_use]
    pub fn cached(&self, path: &Path) -> Option<Digest> {
        self.cache.borrow().get(path).copied()
    }

    fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;

        // Directories open fine on Unix; reject them before reading.
        let metadata = file.metadata().map_err(|e| map_io_error(path, e))?;
        if !metadata.is_file() {
            return Err(HashError::NotAFile(path.to_path_buf()));
        }

        self.files_read.set(self.files_read.get() + 1);

        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        digest_reader(reader).map_err(|e| map_io_error(path, e))
    }
}

impl Digester for ContentHasher {
    fn digest_of(&self, path: &Path) -> Result<Digest, HashError> {
        if let Some(digest) = self.cached(path) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            log::trace!("Digest cache hit: {}", path.display());
            return Ok(digest);
        }

        let digest = self.hash_file(path)?;
        log::trace!("Hashed {} -> {}", path.display(), digest);
        self.cache.borrow_mut().insert(path.to_path_buf(), digest);
        Ok(digest)
    }
}

/// Digest of an in-memory byte slice.
///
/// Matches what [`ContentHasher`] computes for a file with these contents.
#[must_use]
pub fn digest_bytes(data: &[u8]) -> Digest {
    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&Md5::digest(data));
    Digest::from_bytes(bytes)
}

/// Digest everything `reader` yields. Interrupted reads are retried.
fn digest_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = Md5::new();
    io::copy(&mut reader, &mut hasher)?;

    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&hasher.finalize());
    Ok(Digest::from_bytes(bytes))
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    use io::ErrorKind;

    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
