use dupewalk::duplicates::{DuplicateGrouper, FinderError, GrouperConfig};
use dupewalk::scanner::hasher::digest_bytes;
use dupewalk::scanner::{ContentHasher, Digest, Digester, HashError, ScanError};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Wraps a real hasher and refuses one file name.
struct RefusingDigester {
    inner: ContentHasher,
    refuse: &'static str,
    calls: Cell<usize>,
}

impl Digester for RefusingDigester {
    fn digest_of(&self, path: &Path) -> Result<Digest, HashError> {
        self.calls.set(self.calls.get() + 1);
        if path.file_name().is_some_and(|n| n == self.refuse) {
            return Err(HashError::PermissionDenied(path.to_path_buf()));
        }
        self.inner.digest_of(path)
    }
}

#[test]
fn test_missing_root_does_not_stop_valid_root() {
    let good = tempdir().unwrap();
    fs::write(good.path().join("a"), b"dup").unwrap();
    fs::write(good.path().join("b"), b"dup").unwrap();
    let bad = good.path().join("does-not-exist");

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([bad.as_path(), good.path()])
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.summary.scan_errors.len(), 1);
    match &report.summary.scan_errors[0] {
        ScanError::NotFound(p) => assert_eq!(p, &bad),
        other => panic!("Expected NotFound, got: {:?}", other),
    }
}

#[test]
fn test_missing_root_alone_yields_empty_report() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("gone");

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([bad.as_path()])
        .unwrap();

    assert!(report.groups.is_empty());
    assert!(report.summary.has_errors());
}

#[test]
fn test_file_as_root_is_reported() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"data").unwrap();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([file.as_path()])
        .unwrap();

    assert!(report.groups.is_empty());
    assert!(matches!(
        report.summary.scan_errors[0],
        ScanError::NotADirectory(_)
    ));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    fs::write(dir.path().join("locked"), b"same").unwrap();

    let digester = RefusingDigester {
        inner: ContentHasher::new(),
        refuse: "locked",
        calls: Cell::new(0),
    };
    let report = DuplicateGrouper::with_defaults(&digester)
        .scan([dir.path()])
        .unwrap();

    let group = report.groups.get(&digest_bytes(b"same")).unwrap();
    assert_eq!(group.len(), 2);
    assert!(!group.paths().contains(&dir.path().join("locked")));
    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.summary.scan_errors.len(), 1);
    assert!(matches!(
        report.summary.scan_errors[0],
        ScanError::Hash(HashError::PermissionDenied(_))
    ));
    assert_eq!(digester.calls.get(), 3);
}

#[test]
fn test_strict_mode_fails_on_unreadable_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("locked"), b"x").unwrap();

    let digester = RefusingDigester {
        inner: ContentHasher::new(),
        refuse: "locked",
        calls: Cell::new(0),
    };
    let config = GrouperConfig::default().with_strict(true);
    let result = DuplicateGrouper::new(&digester, config).scan([dir.path()]);

    match result {
        Err(FinderError::Scan(ScanError::Hash(HashError::PermissionDenied(_)))) => {}
        other => panic!("Expected PermissionDenied, got: {:?}", other),
    }
}

#[test]
fn test_strict_mode_fails_on_missing_root() {
    let dir = tempdir().unwrap();
    let config = GrouperConfig::default().with_strict(true);
    let hasher = ContentHasher::new();

    let result = DuplicateGrouper::new(&hasher, config).scan([dir.path().join("nope")]);

    assert!(matches!(
        result,
        Err(FinderError::Scan(ScanError::NotFound(_)))
    ));
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_is_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inside"), b"hidden").unwrap();
    fs::write(dir.path().join("outside"), b"visible").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list it anyway; nothing to observe then.
    let listable = fs::read_dir(&locked).is_ok();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !listable {
        assert_eq!(report.summary.total_files, 1);
        assert!(report
            .summary
            .scan_errors
            .iter()
            .any(|e| matches!(e, ScanError::PermissionDenied(_))));
    }
}
