use proptest::prelude::*;
use simdupe::duplicates::{pre_bucket, Criteria, Group, Item, SimpleGrouper};
use simdupe::scanner::{FileEntry, Hasher};
use simdupe::view::{SortKey, ViewModel};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn entries(specs: &[(u8, u64)]) -> Vec<FileEntry> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(name, size))| {
            FileEntry::new(
                PathBuf::from(format!("/fake/{}/file_{}.dat", i, name)),
                size,
                at(i as u64),
            )
        })
        .collect()
}

fn group_from(paths: &[String], mtimes: &[u64]) -> Group {
    let items = paths
        .iter()
        .zip(mtimes)
        .map(|(p, &t)| Item::new(PathBuf::from(p), 1, at(t)))
        .collect();
    Group::new("Match: prop", items)
}

proptest! {
    #[test]
    fn test_cheap_groups_are_sound(
        specs in prop::collection::vec((0u8..4, 0u64..4), 0..40),
        by_name in any::<bool>(),
        by_size in any::<bool>(),
    ) {
        let criteria = Criteria::new(by_name, by_size, false);
        let groups = SimpleGrouper::new(criteria).group(entries(&specs));

        for group in &groups {
            // Every group has at least two members
            prop_assert!(group.len() >= 2);
            let first = &group.items()[0];
            for item in group.items() {
                if criteria.keys_on_size() {
                    prop_assert_eq!(item.size, first.size);
                }
                if criteria.keys_on_name() {
                    prop_assert_eq!(item.file_name(), first.file_name());
                }
            }
        }
    }

    #[test]
    fn test_pre_bucket_drops_singletons(specs in prop::collection::vec((0u8..6, 0u64..6), 0..40)) {
        let all = entries(&specs);
        let buckets = pre_bucket(all.clone(), &Criteria::new(false, true, false));

        let bucketed: usize = buckets.values().map(Vec::len).sum();
        prop_assert!(bucketed <= all.len());
        for members in buckets.values() {
            prop_assert!(members.len() >= 2);
        }
    }

    #[test]
    fn test_pattern_selection_is_complement(
        picks in prop::collection::vec(any::<bool>(), 2..12),
        needle in "[a-c]{1,2}",
    ) {
        let paths: Vec<String> = picks
            .iter()
            .enumerate()
            .map(|(i, &p)| if p { format!("/x/ab{}/f", i) } else { format!("/x/zz{}/f", i) })
            .collect();
        let mtimes: Vec<u64> = (0..paths.len() as u64).collect();

        let mut selected = group_from(&paths, &mtimes);
        let mut kept = selected.clone();
        selected.select_by_pattern(&needle, false);
        kept.select_by_pattern(&needle, true);

        for (a, b) in selected.items().iter().zip(kept.items()) {
            prop_assert_ne!(a.selected, b.selected);
        }
    }

    #[test]
    fn test_keep_newest_leaves_one_newest(mtimes in prop::collection::vec(0u64..20, 2..10)) {
        let paths: Vec<String> = (0..mtimes.len()).map(|i| format!("/p/{}", i)).collect();
        let mut group = group_from(&paths, &mtimes);

        group.mark_all_except_newest();

        let kept: Vec<&Item> = group.items().iter().filter(|i| !i.selected).collect();
        prop_assert_eq!(kept.len(), 1);
        let newest = mtimes.iter().max().copied().unwrap();
        prop_assert_eq!(kept[0].mtime, at(newest));
    }

    #[test]
    fn test_keep_oldest_leaves_one_oldest(mtimes in prop::collection::vec(0u64..20, 2..10)) {
        let paths: Vec<String> = (0..mtimes.len()).map(|i| format!("/p/{}", i)).collect();
        let mut group = group_from(&paths, &mtimes);

        group.mark_all_except_oldest();

        let kept: Vec<&Item> = group.items().iter().filter(|i| !i.selected).collect();
        prop_assert_eq!(kept.len(), 1);
        let oldest = mtimes.iter().min().copied().unwrap();
        prop_assert_eq!(kept[0].mtime, at(oldest));
    }

    #[test]
    fn test_sort_is_idempotent(
        counts in prop::collection::vec(2usize..8, 0..20),
        key in prop::sample::select(vec![SortKey::Size, SortKey::Count, SortKey::Name]),
    ) {
        let groups: Vec<Group> = counts
            .iter()
            .enumerate()
            .map(|(g, &n)| {
                let paths: Vec<String> = (0..n).map(|i| format!("/g{}/{}", g % 3, i)).collect();
                let mtimes: Vec<u64> = (0..n as u64).collect();
                Group::new(format!("Match: g{}", g % 4), paths.iter().zip(&mtimes)
                    .map(|(p, &t)| Item::new(PathBuf::from(p), (g % 5) as u64, at(t)))
                    .collect())
            })
            .collect();
        let mut view = ViewModel::new(groups);

        view.sort(key);
        let once: Vec<String> = view.groups().iter().map(|g| format!("{}{:?}", g.name(), g.items()[0].path)).collect();
        view.sort(key);
        let twice: Vec<String> = view.groups().iter().map(|g| format!("{}{:?}", g.name(), g.items()[0].path)).collect();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_partial_digest_is_deterministic(content in prop::collection::vec(any::<u8>(), 0..20_000)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, &content).unwrap();

        let hasher = Hasher::new();
        let first = hasher.partial_digest(&path, content.len() as u64);
        let second = hasher.partial_digest(&path, content.len() as u64);

        prop_assert!(!first.is_empty());
        prop_assert_eq!(first, second);
        prop_assert_eq!(hasher.full_digest(&path), hasher.full_digest(&path));
    }
}
