//! Scanner module for directory traversal and content digests.
//!
//! This module provides functionality for:
//! - Sequential depth-first directory walking using walkdir
//! - Memoized MD5 content digests
//! - Home directory expansion and lexical normalization of roots
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and [`FileRecord`] production
//! - [`hasher`]: Content digests with a per-run memo table
//! - [`path_utils`]: Root path resolution helpers
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::scanner::{ContentHasher, TreeWalker};
//!
//! let hasher = ContentHasher::new();
//! let mut walker = TreeWalker::open("~/Downloads", &hasher);
//! for record in walker.walk() {
//!     match record {
//!         Ok(file) => println!("{} {}", file.digest, file.path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! walker.close();
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Serialize, Serializer};

pub use hasher::{ContentHasher, Digester};
pub use walker::{TreeWalker, Walk};

/// Length of a digest in bytes (128 bits).
pub const DIGEST_LEN: usize = 16;

/// 128-bit content fingerprint.
///
/// Displays as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex rendering of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        digest_to_hex(&self.0)
    }

    /// Parse a 32-character hex string.
    ///
    /// Returns `None` if the string has the wrong length or contains
    /// non-hex characters.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != DIGEST_LEN * 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut bytes = [0u8; DIGEST_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render digest bytes as lowercase hex.
#[must_use]
pub fn digest_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// One scanned regular file.
///
/// Created by [`TreeWalker`] when a file is visited and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path of the file, joined onto the root it was found under
    pub path: PathBuf,
    /// File size in bytes at stat time
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Content digest
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, digest: Digest) -> Self {
        Self {
            path,
            size,
            modified,
            digest,
        }
    }

    /// Size and digest both match.
    ///
    /// This is stricter than the grouping key, which is the digest alone.
    #[must_use]
    pub fn is_same_content(&self, other: &FileRecord) -> bool {
        self.size == other.size && self.digest == other.digest
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A discovered entry is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The content digest of a file could not be computed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::NotAFile(p) => p,
            Self::Io { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }

    /// Build a scan error from an I/O error, classifying common kinds.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Errors that can occur while computing a content digest.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::NotAFile(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
