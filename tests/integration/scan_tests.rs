use simdupe::duplicates::{Badge, Finder, FinderConfig, FinderError, ScanMode};
use simdupe::scanner::Walker;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn scan(root: &Path, mode: ScanMode) -> Vec<simdupe::duplicates::Group> {
    Finder::new(FinderConfig::default().with_mode(mode))
        .scan(root)
        .unwrap()
}

fn names(group: &simdupe::duplicates::Group) -> Vec<String> {
    let mut names: Vec<String> = group.items().iter().map(|i| i.file_name()).collect();
    names.sort();
    names
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    assert!(scan(dir.path(), ScanMode::default()).is_empty());
    assert!(scan(dir.path(), ScanMode::Smart).is_empty());
}

#[test]
fn test_identical_content_grouped_by_size_and_hash() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.png", b"same bytes");
    write(dir.path(), "b.png", b"same bytes");
    write(dir.path(), "c.png", b"same bytes");
    write(dir.path(), "d.png", b"other byte");

    let groups = scan(dir.path(), ScanMode::simple(false, true, true));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].badge(), Badge::Hash);
    assert_eq!(names(&groups[0]), vec!["a.png", "b.png", "c.png"]);
    assert!(groups[0].name().starts_with("HASH: "));
}

#[test]
fn test_excluded_directories_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "node_modules/pkg/index.js", b"module");
    write(dir.path(), "node_modules/other/index.js", b"module");
    write(dir.path(), ".git/objects/x", b"blob");
    write(dir.path(), "src/.git/objects/x", b"blob");
    write(dir.path(), "keep/one.txt", b"kept");
    write(dir.path(), "keep/two.txt", b"kept");

    let groups = scan(dir.path(), ScanMode::simple(true, true, true));

    for group in &groups {
        for item in group.items() {
            let path = item.path.to_string_lossy();
            assert!(!path.contains("node_modules"), "{}", path);
            assert!(!path.contains(".git"), "{}", path);
        }
    }

    let by_size = scan(dir.path(), ScanMode::simple(false, true, true));
    assert_eq!(by_size.len(), 1);
    assert_eq!(names(&by_size[0]), vec!["one.txt", "two.txt"]);
}

#[test]
fn test_same_size_different_content_split_by_full_hash() {
    let dir = tempdir().unwrap();
    // First and last 8 KiB agree, only the middle differs
    let mut first = vec![b'x'; 40 * 1024];
    let mut second = first.clone();
    first[20 * 1024] = b'1';
    second[20 * 1024] = b'2';
    write(dir.path(), "first.bin", &first);
    write(dir.path(), "second.bin", &second);

    let size_only = scan(dir.path(), ScanMode::simple(false, true, false));
    assert_eq!(size_only.len(), 1);
    assert_eq!(size_only[0].badge(), Badge::Match);

    let hashed = scan(dir.path(), ScanMode::simple(false, true, true));
    assert!(hashed.is_empty());
}

#[test]
fn test_same_size_different_head_split_by_partial_hash() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", &[1u8; 1024]);
    write(dir.path(), "b.bin", &[2u8; 1024]);

    assert!(scan(dir.path(), ScanMode::simple(false, true, true)).is_empty());
}

#[test]
fn test_large_identical_files_grouped() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    write(dir.path(), "x/big.dat", &content);
    write(dir.path(), "y/big.dat", &content);
    write(dir.path(), "z/copy.dat", &content);

    let groups = scan(dir.path(), ScanMode::simple(false, true, true));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].total_size(), 300_000);
}

#[test]
fn test_name_only_grouping() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/readme.md", b"one");
    write(dir.path(), "b/readme.md", b"two, longer");
    write(dir.path(), "c/notes.md", b"three");

    let groups = scan(dir.path(), ScanMode::simple(true, false, false));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].badge(), Badge::Match);
    assert_eq!(groups[0].display_name(), "readme.md");
}

#[test]
fn test_all_criteria_off_behaves_as_name_only() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/readme.md", b"one");
    write(dir.path(), "b/readme.md", b"two, longer");

    let off = scan(dir.path(), ScanMode::simple(false, false, false));
    let name = scan(dir.path(), ScanMode::simple(true, false, false));

    assert_eq!(off.len(), 1);
    assert_eq!(off[0].name(), name[0].name());
}

#[test]
fn test_name_and_size_both_required() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/data.csv", b"12345");
    write(dir.path(), "b/data.csv", b"abcde");
    write(dir.path(), "c/data.csv", b"123");

    let groups = scan(dir.path(), ScanMode::simple(true, true, false));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(groups[0].items().iter().all(|i| i.size == 5));
    assert_eq!(groups[0].display_name(), "data.csv | 5");
}

#[test]
fn test_empty_files_are_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.empty", b"");
    write(dir.path(), "b.empty", b"");

    let groups = scan(dir.path(), ScanMode::simple(false, true, true));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].total_size(), 0);
}

#[test]
fn test_no_path_in_two_groups() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(dir.path(), &format!("d{}/same.txt", i), format!("{}", i % 2).as_bytes());
    }

    let groups = scan(dir.path(), ScanMode::simple(false, true, true));

    let mut seen = std::collections::HashSet::new();
    for item in groups.iter().flat_map(|g| g.items()) {
        assert!(seen.insert(item.path.clone()));
    }
    assert_eq!(groups.len(), 2);
}

#[test]
fn test_missing_root_is_error() {
    let dir = tempdir().unwrap();
    let err = Finder::with_defaults()
        .scan(&dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, FinderError::Root(_)));
}

#[test]
fn test_file_root_is_error() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "file.txt", b"x");
    assert!(Finder::with_defaults().scan(&file).is_err());
}

#[test]
fn test_cancelled_scan_returns_no_groups() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    write(dir.path(), "b.txt", b"dup");

    let flag = Arc::new(AtomicBool::new(true));
    let groups = Finder::new(FinderConfig::default().with_cancel_flag(flag))
        .scan(dir.path())
        .unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_status_messages_end_with_ready() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    write(dir.path(), "b.txt", b"dup");

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let callback = Arc::new(move |msg: &str| sink.lock().unwrap().push(msg.to_string()));

    let finder = Finder::new(
        FinderConfig::default()
            .with_mode(ScanMode::simple(false, true, true))
            .with_progress_callback(callback),
    );
    finder.scan(dir.path()).unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m == "Analyzing..."));
    assert!(messages.last().unwrap().starts_with("Ready"));
}

#[test]
fn test_walker_yields_regular_files_only() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"a");
    write(dir.path(), "sub/b.txt", b"b");
    fs::create_dir(dir.path().join("empty")).unwrap();
    write(dir.path(), "__pycache__/c.pyc", b"c");

    let mut walk = Walker::new(dir.path()).walk().unwrap();
    let mut files: Vec<String> = walk.by_ref().map(|e| e.file_name()).collect();
    files.sort();

    assert_eq!(files, vec!["a.txt", "b.txt"]);
    assert_eq!(walk.indexed(), 2);
    walk.close();
    assert!(walk.next().is_none());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    let target = write(dir.path(), "real/file.txt", b"content");
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linkdir")).unwrap();

    let files: Vec<_> = Walker::new(dir.path()).walk().unwrap().collect();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name(), "file.txt");
}

#[test]
fn test_hash_groups_share_full_digest() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..50_000u32).map(|i| (i % 253) as u8).collect();
    let mut big_variant = big.clone();
    big_variant[25_000] ^= 0xff;
    write(dir.path(), "a/big.bin", &big);
    write(dir.path(), "b/big.bin", &big);
    write(dir.path(), "c/variant.bin", &big_variant);
    write(dir.path(), "a/small.txt", b"small");
    write(dir.path(), "b/small.txt", b"small");
    write(dir.path(), "c/other.txt", b"other");

    let groups = scan(dir.path(), ScanMode::simple(false, true, true));
    let hasher = simdupe::scanner::Hasher::new();

    assert_eq!(groups.len(), 2);
    for group in &groups {
        assert_eq!(group.badge(), Badge::Hash);
        let digests: Vec<String> = group
            .items()
            .iter()
            .map(|i| hasher.full_digest(&i.path))
            .collect();
        assert!(!digests[0].is_empty());
        assert!(digests.iter().all(|d| d == &digests[0]));
    }
}
