//! Smart-mode grouping: versioned variants and numbered sequences.
//!
//! A file name is split into `stem`, number and extension by
//! [`SMART_PATTERN`]. Files in the same directory that share the lowercased
//! stem and extension are grouped:
//!
//! - more than [`SEQUENCE_MIN_COUNT`] members, or a first member (smallest
//!   file name) numbered at least [`SEQUENCE_MIN_DIGITS`] digits wide: a
//!   `SEQ` group sorted by file name
//! - otherwise a `VER` group sorted newest first
//!
//! ```
//! use simdupe::duplicates::smart::split_name;
//!
//! let parts = split_name("photo_v02.jpg").unwrap();
//! assert_eq!(parts.stem, "photo");
//! assert_eq!(parts.digits, 2);
//! assert_eq!(parts.extension, ".jpg");
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use super::groups::{Badge, Group, Item};
use crate::scanner::FileEntry;

/// Name pattern: stem, optional separator, optional `v`, number, extension.
pub const SMART_PATTERN: &str = r"^(.*?)[-_ .]*(?:v|V)?(\d+)[-_ .]*(\.[A-Za-z0-9]+)$";

/// A group with more members than this is a sequence.
pub const SEQUENCE_MIN_COUNT: usize = 12;

/// A first number at least this wide makes a sequence.
pub const SEQUENCE_MIN_DIGITS: usize = 3;

/// Stem used when the name starts with the number.
const EMPTY_STEM: &str = "root";

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(SMART_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("Smart pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

/// The parts of a file name matched by [`SMART_PATTERN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    /// Stem as written, `"root"` when empty
    pub stem: String,
    /// Width of the numeric run, in digits
    pub digits: usize,
    /// Extension including the dot, as written
    pub extension: String,
}

/// Split a file name, or `None` when it does not look numbered.
#[must_use]
pub fn split_name(file_name: &str) -> Option<NameParts> {
    let caps = pattern()?.captures(file_name)?;
    let stem = caps.get(1).map_or("", |m| m.as_str());
    Some(NameParts {
        stem: if stem.is_empty() {
            EMPTY_STEM.to_string()
        } else {
            stem.to_string()
        },
        digits: caps.get(2).map_or(0, |m| m.as_str().chars().count()),
        extension: caps.get(3).map_or("", |m| m.as_str()).to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SmartKey {
    parent: PathBuf,
    stem: String,
    extension: String,
}

#[derive(Debug)]
struct Candidate {
    first_name: String,
    stem: String,
    first_digits: usize,
    members: Vec<FileEntry>,
}

/// Accumulated smart-mode candidates, keyed per directory and stem.
#[derive(Debug, Default)]
pub struct Candidates {
    by_key: HashMap<SmartKey, Candidate>,
    order: Vec<SmartKey>,
}

impl Candidates {
    /// Add one entry. Entries whose name does not match are ignored.
    pub fn push(&mut self, entry: FileEntry) {
        let name = entry.file_name();
        let Some(parts) = split_name(&name) else {
            log::trace!("Smart: no number in {}", name);
            return;
        };
        let key = SmartKey {
            parent: entry.path.parent().map(PathBuf::from).unwrap_or_default(),
            stem: parts.stem.to_lowercase(),
            extension: parts.extension.to_lowercase(),
        };

        match self.by_key.get_mut(&key) {
            Some(candidate) => {
                // The lexically smallest name is the first member
                if name < candidate.first_name {
                    candidate.first_name = name;
                    candidate.stem = parts.stem;
                    candidate.first_digits = parts.digits;
                }
                candidate.members.push(entry);
            }
            None => {
                self.order.push(key.clone());
                self.by_key.insert(
                    key,
                    Candidate {
                        first_name: name,
                        stem: parts.stem,
                        first_digits: parts.digits,
                        members: vec![entry],
                    },
                );
            }
        }
    }

    /// Number of distinct keys seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no entry matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Classify every key with two or more members into a group.
    #[must_use]
    pub fn into_groups(mut self) -> Vec<Group> {
        let mut groups = Vec::new();
        for key in self.order {
            let Some(candidate) = self.by_key.remove(&key) else {
                continue;
            };
            if candidate.members.len() < 2 {
                continue;
            }
            groups.push(classify(&key, candidate));
        }
        groups
    }
}

impl FromIterator<FileEntry> for Candidates {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut candidates = Self::default();
        for entry in iter {
            candidates.push(entry);
        }
        candidates
    }
}

fn is_sequence(count: usize, first_digits: usize) -> bool {
    count > SEQUENCE_MIN_COUNT || first_digits >= SEQUENCE_MIN_DIGITS
}

fn classify(key: &SmartKey, candidate: Candidate) -> Group {
    let parent_name = key
        .parent
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.parent.display().to_string());

    let mut items: Vec<Item> = candidate.members.into_iter().map(Item::from).collect();
    let badge = if is_sequence(items.len(), candidate.first_digits) {
        items.sort_by_key(Item::file_name);
        Badge::Seq
    } else {
        items.sort_by(|a, b| b.mtime.cmp(&a.mtime));
        Badge::Ver
    };

    Group::patterned(badge, &parent_name, &candidate.stem, items)
}

/// Group a stream of entries by version/sequence pattern.
pub fn group_smart<I>(entries: I) -> Vec<Group>
where
    I: IntoIterator<Item = FileEntry>,
{
    let candidates: Candidates = entries.into_iter().collect();
    log::debug!("Smart: {} candidate keys", candidates.len());
    candidates.into_groups()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn entry(path: &str, secs: u64) -> FileEntry {
        FileEntry::new(
            PathBuf::from(path),
            10,
            SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        )
    }

    // ==================== Pattern Tests ====================

    #[test]
    fn test_split_version_name() {
        let parts = split_name("Report-V3.PDF").unwrap();
        assert_eq!(parts.stem, "Report");
        assert_eq!(parts.digits, 1);
        assert_eq!(parts.extension, ".PDF");
    }

    #[test]
    fn test_split_frame_name() {
        let parts = split_name("frame_0001.png").unwrap();
        assert_eq!(parts.stem, "frame");
        assert_eq!(parts.digits, 4);
    }

    #[test]
    fn test_split_unicode_digit_width() {
        let parts = split_name("photo_\u{ff10}\u{ff11}.jpg").unwrap();
        assert_eq!(parts.stem, "photo");
        assert_eq!(parts.digits, 2);
    }

    #[test]
    fn test_split_bare_number_uses_root_stem() {
        let parts = split_name("001.png").unwrap();
        assert_eq!(parts.stem, "root");
    }

    #[test]
    fn test_split_rejects_unnumbered() {
        assert!(split_name("notes.txt").is_none());
        assert!(split_name("draft3").is_none());
    }

    // ==================== Grouping Tests ====================

    #[test]
    fn test_versions_sorted_newest_first() {
        let groups = group_smart(vec![
            entry("/docs/photo_v01.jpg", 1),
            entry("/docs/photo_v03.jpg", 3),
            entry("/docs/photo_v02.jpg", 2),
        ]);

        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.badge(), Badge::Ver);
        assert_eq!(g.name(), "VER: docs/photo");
        let names: Vec<_> = g.items().iter().map(Item::file_name).collect();
        assert_eq!(names, vec!["photo_v03.jpg", "photo_v02.jpg", "photo_v01.jpg"]);
    }

    #[test]
    fn test_wide_number_is_sequence() {
        let groups = group_smart(vec![
            entry("/r/shot_002.exr", 5),
            entry("/r/shot_001.exr", 9),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].badge(), Badge::Seq);
        assert_eq!(groups[0].items()[0].file_name(), "shot_001.exr");
    }

    #[test]
    fn test_fullwidth_two_digit_versions_stay_versions() {
        let groups = group_smart(vec![
            entry("/d/photo_\u{ff10}\u{ff11}.jpg", 1),
            entry("/d/photo_\u{ff10}\u{ff12}.jpg", 2),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].badge(), Badge::Ver);
        assert_eq!(groups[0].items()[0].file_name(), "photo_\u{ff10}\u{ff12}.jpg");
    }

    #[test]
    fn test_first_member_is_smallest_name() {
        let forward = group_smart(vec![
            entry("/t/take_9.mov", 1),
            entry("/t/take_10.mov", 2),
            entry("/t/Take_100.mov", 3),
        ]);
        let reverse = group_smart(vec![
            entry("/t/take_10.mov", 2),
            entry("/t/take_9.mov", 1),
            entry("/t/Take_100.mov", 3),
        ]);

        // "Take_100.mov" sorts first, so the width is 3 either way
        for groups in [&forward, &reverse] {
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].badge(), Badge::Seq);
            assert_eq!(groups[0].name(), "SEQ: t/Take");
        }
    }

    #[test]
    fn test_many_members_is_sequence() {
        let entries: Vec<_> = (1..=13)
            .map(|i| entry(&format!("/p/page{}.txt", i), i))
            .collect();
        let groups = group_smart(entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].badge(), Badge::Seq);
        assert_eq!(groups[0].len(), 13);
    }

    #[test]
    fn test_twelve_members_is_version() {
        let entries: Vec<_> = (1..=12)
            .map(|i| entry(&format!("/p/page{}.txt", i), i))
            .collect();
        let groups = group_smart(entries);
        assert_eq!(groups[0].badge(), Badge::Ver);
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let groups = group_smart(vec![
            entry("/d/Photo_1.JPG", 1),
            entry("/d/photo_2.jpg", 2),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_different_parents_not_grouped() {
        let groups = group_smart(vec![entry("/a/x_1.txt", 1), entry("/b/x_2.txt", 2)]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_different_extensions_not_grouped() {
        let groups = group_smart(vec![entry("/a/x_1.txt", 1), entry("/a/x_2.md", 2)]);
        assert!(groups.is_empty());
    }
}
