use simdupe::duplicates::{Group, GroupListExt, Item};
use simdupe::view::{SortKey, ViewModel, PAGE_SIZE};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

fn group(name: &str, count: usize, size: u64) -> Group {
    let items = (0..count)
        .map(|i| {
            Item::new(
                PathBuf::from(format!("/data/{}/{}.bin", name, i)),
                size,
                SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64),
            )
        })
        .collect();
    Group::new(format!("Match: {}", name), items)
}

fn visible_counts(view: &ViewModel) -> Vec<usize> {
    view.page(0).iter().map(|g| g.len()).collect()
}

#[test]
fn test_sort_by_count_descending() {
    let groups = [2, 7, 3, 10, 4]
        .iter()
        .enumerate()
        .map(|(i, &n)| group(&format!("g{}", i), n, 1))
        .collect();
    let mut view = ViewModel::new(groups);

    view.sort(SortKey::Count);

    assert_eq!(visible_counts(&view), vec![10, 7, 4, 3, 2]);
}

#[test]
fn test_sort_by_size_and_name() {
    let mut view = ViewModel::new(vec![
        group("beta", 2, 10),
        group("Alpha", 2, 30),
        group("gamma", 3, 5),
    ]);

    view.sort(SortKey::Size);
    let sizes: Vec<u64> = view.page(0).iter().map(|g| g.total_size()).collect();
    assert_eq!(sizes, vec![60, 20, 15]);

    view.sort(SortKey::Name);
    let names: Vec<&str> = view.page(0).iter().map(|g| g.display_name()).collect();
    assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
}

#[test]
fn test_sort_resets_page() {
    let groups = (0..PAGE_SIZE * 2 + 5).map(|i| group(&format!("g{}", i), 2, 1)).collect();
    let mut view = ViewModel::new(groups);

    assert_eq!(view.page_count(), 3);
    assert!(view.next_page());
    assert!(view.next_page());
    assert!(!view.next_page());
    assert_eq!(view.page(view.current_page()).len(), 5);

    view.sort(SortKey::Count);
    assert_eq!(view.current_page(), 0);
}

#[test]
fn test_pages_partition_the_list() {
    let groups = (0..PAGE_SIZE + 1).map(|i| group(&format!("g{}", i), 2, 1)).collect();
    let view = ViewModel::new(groups);

    assert_eq!(view.page(0).len(), PAGE_SIZE);
    assert_eq!(view.page(1).len(), 1);
    assert!(view.page(2).is_empty());
}

#[test]
fn test_filter_matches_name_or_path_case_insensitive() {
    let mut view = ViewModel::new(vec![
        group("Photos", 2, 1),
        group("music", 2, 1),
        group("docs", 2, 1),
    ]);

    view.set_filter("PHOTO");
    assert_eq!(view.visible_len(), 1);

    view.set_filter("/data/");
    assert_eq!(view.visible_len(), 3);

    view.set_filter("nothing");
    assert_eq!(view.visible_len(), 0);

    view.set_filter("");
    assert_eq!(view.visible_len(), 3);
}

#[test]
fn test_aggregate_tracks_selection() {
    let mut view = ViewModel::new(vec![group("a", 3, 100), group("b", 2, 50)]);

    let before = view.aggregate();
    assert_eq!(before.total_groups, 2);
    assert_eq!(before.total_items, 5);
    assert_eq!(before.total_selected_items, 0);
    assert_eq!(before.reclaimable, 0);

    view.groups_mut().keep_oldest();
    let after = view.aggregate();
    assert_eq!(after.total_selected_items, 3);
    assert_eq!(after.reclaimable, 250);
}

#[test]
fn test_selection_survives_sorting() {
    let mut view = ViewModel::new(vec![group("a", 2, 1), group("b", 4, 1)]);
    view.groups_mut().keep_newest();

    view.sort(SortKey::Count);
    view.sort(SortKey::Name);

    assert_eq!(view.aggregate().total_selected_items, 4);
}
