use simdupe::actions::{execute, execute_paths, DeleteMode};
use simdupe::duplicates::{Finder, FinderConfig, GroupListExt, ScanMode};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_execute_deletes_selected_and_keeps_rest() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), b"duplicate").unwrap();
    }

    let mut groups = Finder::new(FinderConfig::default().with_mode(ScanMode::simple(false, true, true)))
        .scan(dir.path())
        .unwrap();
    groups.keep_oldest();
    let kept: Vec<_> = groups
        .iter()
        .flat_map(|g| g.items())
        .filter(|i| !i.selected)
        .map(|i| i.path.clone())
        .collect();

    let report = execute(&groups, DeleteMode::Permanent);

    assert_eq!(report.successes, 2);
    assert!(report.all_succeeded());
    assert_eq!(report.bytes_freed, 18);
    assert_eq!(kept.len(), 1);
    assert!(kept[0].exists());
    let remaining = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(remaining, 1);
}

#[test]
fn test_execute_continues_past_failures() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.txt");
    let missing = dir.path().join("missing.txt");
    let also_present = dir.path().join("also.txt");
    fs::write(&present, b"one").unwrap();
    fs::write(&also_present, b"two").unwrap();

    let report = execute_paths(&[&present, &missing, &also_present], DeleteMode::Permanent);

    assert_eq!(report.successes, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("missing.txt"));
    assert!(!present.exists());
    assert!(!also_present.exists());
    assert!(report.summary().contains("1 failed"));
}

#[test]
fn test_execute_with_nothing_selected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();
    fs::write(dir.path().join("b"), b"x").unwrap();

    let groups = Finder::with_defaults().scan(dir.path()).unwrap();
    let report = execute(&groups, DeleteMode::Permanent);

    assert_eq!(report.successes, 0);
    assert!(report.errors.is_empty());
    assert!(dir.path().join("a").exists());
}

#[test]
fn test_rescan_after_delete_drops_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), b"same").unwrap();
    fs::write(dir.path().join("b.bin"), b"same").unwrap();

    let finder = Finder::with_defaults();
    let mut groups = finder.scan(dir.path()).unwrap();
    assert_eq!(groups.len(), 1);

    groups.keep_newest();
    execute(&groups, DeleteMode::Permanent);

    assert!(finder.scan(dir.path()).unwrap().is_empty());
}
