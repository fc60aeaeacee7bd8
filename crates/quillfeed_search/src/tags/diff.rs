//! Tag set diffing.
//!
//! # Responsibility
//! - Compute which tags to add and which to remove between two tag sets.
//!
//! # Invariants
//! - `to_add` and `to_remove` are disjoint and contain no duplicates.
//! - `diff_tags(s, s)` is empty for any set `s`.

use std::collections::{BTreeSet, HashSet};

/// Additions and removals between an old and a new tag set.
///
/// Sets are kept in `BTreeSet`s so iteration order is deterministic for
/// callers that log or persist the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Tags present in the new set but not the old one.
    pub to_add: BTreeSet<String>,
    /// Tags present in the old set but not the new one.
    pub to_remove: BTreeSet<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diffs two tag collections using hash-set membership.
///
/// Duplicate entries on either side collapse before comparison.
pub fn diff_tags(old: &[String], new: &[String]) -> TagDiff {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    let to_add = new
        .iter()
        .filter(|tag| !old_set.contains(tag.as_str()))
        .cloned()
        .collect();
    let to_remove = old
        .iter()
        .filter(|tag| !new_set.contains(tag.as_str()))
        .cloned()
        .collect();

    TagDiff { to_add, to_remove }
}
