use dupewalk::duplicates::DuplicateGrouper;
use dupewalk::scanner::hasher::digest_bytes;
use dupewalk::scanner::{ContentHasher, TreeWalker};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let hasher = ContentHasher::new();

    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 0);
    assert_eq!(report.summary.duplicate_groups, 0);
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.txt"), b"world").unwrap();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = report.groups.get(&digest_bytes(b"hello")).unwrap();
    assert_eq!(group.digest.to_hex(), "5d41402abc4b2a76b9719d911017c592");

    // Group order is the order a fresh walk produces the files.
    let mut walker = TreeWalker::open(dir.path(), &hasher);
    let walk_order: Vec<PathBuf> = walker
        .walk()
        .filter_map(Result::ok)
        .map(|f| f.path)
        .filter(|p| p.file_name().unwrap() != "c.txt")
        .collect();
    walker.close();
    assert_eq!(group.paths(), walk_order);

    let c = dir.path().join("c.txt");
    assert!(report.groups.iter().all(|g| !g.paths().contains(&c)));
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 3);
    assert_eq!(report.summary.unique_digests, 3);
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("top.bin"), b"nested payload").unwrap();
    fs::write(deep.join("bottom.bin"), b"nested payload").unwrap();
    fs::write(dir.path().join("one").join("other.bin"), b"other").unwrap();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = report.groups.iter().next().unwrap();
    let paths = group.paths();
    assert!(paths.contains(&dir.path().join("top.bin")));
    assert!(paths.contains(&deep.join("bottom.bin")));
    assert_eq!(report.summary.reclaimable_space, 14);
}

#[test]
fn test_empty_files_group_together() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = report.groups.get(&digest_bytes(b"")).unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group.size(), 0);
}

#[test]
fn test_multiple_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), b"alpha").unwrap();
    fs::write(dir.path().join("a2"), b"alpha").unwrap();
    fs::write(dir.path().join("b1"), b"beta").unwrap();
    fs::write(dir.path().join("b2"), b"beta").unwrap();
    fs::write(dir.path().join("b3"), b"beta").unwrap();
    fs::write(dir.path().join("c"), b"gamma").unwrap();

    let hasher = ContentHasher::new();
    let report = DuplicateGrouper::with_defaults(&hasher)
        .scan([dir.path()])
        .unwrap();

    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups.get(&digest_bytes(b"alpha")).unwrap().len(), 2);
    assert_eq!(report.groups.get(&digest_bytes(b"beta")).unwrap().len(), 3);
    assert_eq!(report.summary.duplicate_files, 5);
    assert_eq!(report.summary.reclaimable_space, 5 + 8);
    for group in &report.groups {
        assert!(group.files.iter().all(|f| f.digest == group.digest));
    }
}

#[test]
fn test_rescan_served_from_cache() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();

    let hasher = ContentHasher::new();
    let grouper = DuplicateGrouper::with_defaults(&hasher);
    let first = grouper.scan([dir.path()]).unwrap();
    let second = grouper.scan([dir.path()]).unwrap();

    assert_eq!(hasher.files_read(), 2);
    assert_eq!(hasher.cache_hits(), 2);
    assert_eq!(
        first.groups.iter().next().unwrap().paths(),
        second.groups.iter().next().unwrap().paths()
    );
}
