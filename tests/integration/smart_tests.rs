use filetime::{set_file_mtime, FileTime};
use simdupe::duplicates::{Badge, Finder, FinderConfig, Group, GroupListExt, ScanMode};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn smart_scan(root: &Path) -> Vec<Group> {
    Finder::new(FinderConfig::default().with_mode(ScanMode::Smart))
        .scan(root)
        .unwrap()
}

fn write_at(dir: &Path, name: &str, secs: i64) {
    let path = dir.join(name);
    fs::write(&path, name.as_bytes()).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn file_names(group: &Group) -> Vec<String> {
    group.items().iter().map(|i| i.file_name()).collect()
}

#[test]
fn test_versions_ordered_newest_first() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "photo_v01.jpg", 1_000);
    write_at(dir.path(), "photo_v02.jpg", 2_000);
    write_at(dir.path(), "photo_v03.jpg", 3_000);

    let mut groups = smart_scan(dir.path());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].badge(), Badge::Ver);
    assert_eq!(
        file_names(&groups[0]),
        vec!["photo_v03.jpg", "photo_v02.jpg", "photo_v01.jpg"]
    );

    groups.keep_newest();
    let kept: Vec<String> = groups[0]
        .items()
        .iter()
        .filter(|i| !i.selected)
        .map(|i| i.file_name())
        .collect();
    assert_eq!(kept, vec!["photo_v03.jpg"]);
    assert_eq!(groups.selected_count(), 2);
}

#[test]
fn test_long_numbered_run_is_sequence() {
    let dir = tempdir().unwrap();
    // Written out of order so the lexical sort is observable
    for i in (1..=50).rev() {
        write_at(dir.path(), &format!("frame_{:04}.png", i), 1_000 + i64::from(i));
    }

    let groups = smart_scan(dir.path());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].badge(), Badge::Seq);
    assert_eq!(groups[0].len(), 50);

    let names = file_names(&groups[0]);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names[0], "frame_0001.png");
}

#[test]
fn test_wide_digits_make_a_sequence_even_when_short() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "scan_001.tif", 10);
    write_at(dir.path(), "scan_002.tif", 20);

    let groups = smart_scan(dir.path());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].badge(), Badge::Seq);
}

#[test]
fn test_group_name_is_parent_and_stem() {
    let dir = tempdir().unwrap();
    let renders = dir.path().join("renders");
    fs::create_dir(&renders).unwrap();
    write_at(&renders, "shot_v1.exr", 10);
    write_at(&renders, "shot_v2.exr", 20);

    let groups = smart_scan(dir.path());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name(), "VER: renders/shot");
    assert_eq!(groups[0].display_name(), "renders/shot");
}

#[test]
fn test_different_extensions_or_directories_not_grouped() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "logo_v1.png", 10);
    write_at(dir.path(), "logo_v2.svg", 20);
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_at(&sub, "logo_v3.png", 30);

    assert!(smart_scan(dir.path()).is_empty());
}

#[test]
fn test_unnumbered_files_ignored() {
    let dir = tempdir().unwrap();
    write_at(dir.path(), "readme.md", 10);
    write_at(dir.path(), "notes.md", 20);
    write_at(dir.path(), "draft_v1.md", 30);

    assert!(smart_scan(dir.path()).is_empty());
}

#[test]
fn test_every_smart_group_has_two_items() {
    let dir = tempdir().unwrap();
    for (i, name) in ["a_1.txt", "a_2.txt", "b_1.txt", "c_7.log", "c_8.log", "c_9.log"]
        .iter()
        .enumerate()
    {
        write_at(dir.path(), name, 100 + i as i64);
    }

    let groups = smart_scan(dir.path());

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.len() >= 2));
}
