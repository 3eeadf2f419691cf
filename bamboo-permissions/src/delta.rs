// SPDX-License-Identifier: MIT OR Apache-2.0

//! Set differences between two lists.
use std::collections::HashSet;
use std::hash::Hash;

/// Elements added and removed between a previous and a current list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delta<T> {
    /// Elements of the current list missing from the previous one.
    pub added: Vec<T>,

    /// Elements of the previous list missing from the current one.
    pub removed: Vec<T>,
}

impl<T> Delta<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the set difference between `previous` and `current`.
///
/// Duplicates collapse. Each side of the result keeps the order in which elements first appear
/// in their input list.
pub fn delta<T>(previous: &[T], current: &[T]) -> Delta<T>
where
    T: Clone + Eq + Hash,
{
    let previous_set: HashSet<&T> = previous.iter().collect();
    let current_set: HashSet<&T> = current.iter().collect();

    Delta {
        added: only_in(current, &previous_set),
        removed: only_in(previous, &current_set),
    }
}

fn only_in<T>(items: &[T], other: &HashSet<&T>) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !other.contains(item) && seen.insert(*item))
        .cloned()
        .collect()
}

/// Returns `true` if both lists contain the same elements, ignoring their order.
pub fn equals_ignore_order<T>(a: &[T], b: &[T]) -> bool
where
    T: Ord,
{
    if a.len() != b.len() {
        return false;
    }

    let mut a: Vec<&T> = a.iter().collect();
    let mut b: Vec<&T> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{delta, equals_ignore_order};

    fn set<'a>(items: &'a [&'a str]) -> HashSet<&'a str> {
        items.iter().copied().collect()
    }

    #[test]
    fn added_and_removed() {
        let result = delta(&["a", "b", "c"], &["b", "c", "d", "e"]);
        assert_eq!(result.added.iter().copied().collect::<HashSet<_>>(), set(&["d", "e"]));
        assert_eq!(result.removed.iter().copied().collect::<HashSet<_>>(), set(&["a"]));
    }

    #[test]
    fn duplicates_collapse() {
        let result = delta(&["a", "a", "b"], &["c", "c"]);
        assert_eq!(result.added, vec!["c"]);
        assert_eq!(result.removed.len(), 2);
        assert_eq!(result.removed.iter().copied().collect::<HashSet<_>>(), set(&["a", "b"]));
    }

    #[test]
    fn identical_and_empty_inputs() {
        assert!(delta(&["a", "b"], &["b", "a"]).is_empty());
        assert!(delta::<&str>(&[], &[]).is_empty());

        let result = delta(&[], &["x"]);
        assert_eq!(result.added, vec!["x"]);
        assert!(result.removed.is_empty());
    }

    #[test]
    fn order_insensitive_equality() {
        assert!(equals_ignore_order(&["READ", "WRITE"], &["WRITE", "READ"]));
        assert!(equals_ignore_order::<&str>(&[], &[]));
        assert!(!equals_ignore_order(&["READ"], &["READ", "WRITE"]));
        assert!(!equals_ignore_order(&["READ", "READ"], &["READ", "WRITE"]));
    }
}
