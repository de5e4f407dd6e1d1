//! Root path resolution utilities.
//!
//! Roots given on the command line may start with `~` and may be spelled
//! in several ways (`a/b`, `a/./b/`). These helpers expand the home marker
//! and produce a lexical key so the same root is only scanned once.
//!
//! # Example
//!
//! ```
//! use dupewalk::scanner::path_utils::normalize_lexically;
//! use std::path::{Path, PathBuf};
//!
//! assert_eq!(normalize_lexically(Path::new("a/./b/")), PathBuf::from("a/b"));
//! ```

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

/// Expand a leading `~` to the current user's home directory.
///
/// Only `~` alone or `~/...` is expanded; `~user` forms are left untouched,
/// as is any path when the home directory cannot be determined.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => expand_home_with(path, dirs.home_dir()),
        None => {
            log::debug!("Home directory unknown, not expanding {}", path.display());
            path.to_path_buf()
        }
    }
}

/// Expand a leading `~` against an explicit home directory.
#[must_use]
pub fn expand_home_with(path: &Path, home: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            }
        }
        _ => path.to_path_buf(),
    }
}

/// Normalize a path without touching the filesystem.
///
/// Drops `.` components and trailing separators. `..` is kept as is, since
/// resolving it lexically is wrong in the presence of symlinks. An empty
/// result becomes `.`.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Resolve a root the way it will be walked: home expansion, then lexical
/// normalization.
#[must_use]
pub fn resolve_root(path: &Path) -> PathBuf {
    normalize_lexically(&expand_home(path))
}

/// Filesystem identity of a path, with symlinks, `.` and `..` resolved.
///
/// Falls back to the path as given when it cannot be resolved, e.g. because
/// it does not exist.
#[must_use]
pub fn identity_of(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Identity of `file`, found by walking `root`, given the identity of the
/// root itself.
///
/// A walk does not follow links below its root, so the part of `file`
/// under `root` is already resolved and only the root needs canonicalizing.
#[must_use]
pub fn identity_under(root: &Path, root_identity: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) => root_identity.join(relative),
        Err(_) => identity_of(file),
    }
}
