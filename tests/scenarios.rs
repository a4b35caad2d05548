use std::collections::BTreeSet;

use ivtree::{Interval, IntervalTree};

fn iv(start: u64, end: u64) -> Interval<u64> {
    Interval::new(start, end).unwrap()
}

fn pairs<I: IntoIterator<Item = Interval<u64>>>(intervals: I) -> Vec<(u64, u64)> {
    intervals
        .into_iter()
        .map(|interval| (interval.start(), interval.end()))
        .collect()
}

fn overlapping(tree: &IntervalTree<u64>, query: Interval<u64>) -> Vec<(u64, u64)> {
    let mut found = BTreeSet::new();
    tree.overlap_search(&query, &mut found);
    pairs(found)
}

/// Inserts the demo sequence; the interval `[0,26)` must be rejected because
/// `[0,6)` already claimed start offset 0.
fn demo_tree() -> IntervalTree<u64> {
    let mut tree = IntervalTree::new();
    for (start, end) in [
        (16, 20),
        (2, 8),
        (21, 25),
        (26, 31),
        (5, 10),
        (8, 10),
        (9, 15),
        (0, 6),
        (13, 18),
    ] {
        assert!(tree.insert(iv(start, end)));
    }
    assert!(!tree.insert(iv(0, 26)), "duplicate start 0 must be rejected");
    assert!(tree.insert(iv(10, 15)));
    tree
}

#[test]
fn single_pair() {
    let mut tree = IntervalTree::new();
    assert!(tree.insert(iv(10, 15)));

    assert_eq!(overlapping(&tree, iv(9, 14)), vec![(10, 15)]);

    let mut out = Vec::new();
    tree.write_sequence(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "[10,15[ ");
}

#[test]
fn demo_sequence() {
    let tree = demo_tree();
    assert_eq!(tree.len(), 10);
    assert_eq!(
        pairs(tree.iter()),
        vec![
            (0, 6),
            (2, 8),
            (5, 10),
            (8, 10),
            (9, 15),
            (10, 15),
            (13, 18),
            (16, 20),
            (21, 25),
            (26, 31),
        ]
    );

    let mut out = Vec::new();
    tree.write_sequence(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "[0,6[ [2,8[ [5,10[ [8,10[ [9,15[ [10,15[ [13,18[ [16,20[ [21,25[ [26,31[ "
    );
}

#[test]
fn overlap_pruning() {
    let tree = demo_tree();
    assert_eq!(
        overlapping(&tree, iv(12, 14)),
        vec![(9, 15), (10, 15), (13, 18)]
    );
    assert_eq!(overlapping(&tree, iv(100, 200)), vec![]);
}

#[test]
fn remove_rebalances() {
    let mut tree = demo_tree();
    assert!(tree.remove(iv(16, 20)));
    assert!(!tree.remove(iv(16, 20)), "second removal must miss");

    assert!(!tree.search_offset(16).is_valid());
    assert!(!tree.search(iv(16, 20)).is_valid());
    assert_eq!(
        pairs(tree.iter()),
        vec![
            (0, 6),
            (2, 8),
            (5, 10),
            (8, 10),
            (9, 15),
            (10, 15),
            (13, 18),
            (21, 25),
            (26, 31),
        ]
    );
    assert_eq!(overlapping(&tree, iv(12, 19)), vec![(9, 15), (10, 15), (13, 18)]);

    // The hierarchy dump renders one line per surviving node.
    let mut out = Vec::new();
    tree.write_hierarchy(&mut out).unwrap();
    let dump = String::from_utf8(out).unwrap();
    assert_eq!(dump.lines().count(), tree.len());
    assert!(dump.lines().next().unwrap().starts_with("R----"));
    assert!(dump.contains("(BLACK)"));
}

#[test]
fn interval_algebra() {
    let a = iv(5, 15);

    let (left, right) = a.difference(&iv(3, 7));
    assert!(!left.is_valid());
    assert_eq!((right.start(), right.end()), (7, 15));

    let (left, right) = a.difference(&iv(7, 16));
    assert_eq!((left.start(), left.end()), (5, 7));
    assert!(!right.is_valid());

    let (left, right) = a.difference(&iv(7, 12));
    assert_eq!((left.start(), left.end()), (5, 7));
    assert_eq!((right.start(), right.end()), (12, 15));

    let (left, right) = a.difference(&iv(4, 16));
    assert!(!left.is_valid());
    assert!(!right.is_valid());

    // Disjoint operands collapse to the same invalid pair as full coverage.
    let (left, right) = a.difference(&iv(20, 30));
    assert!(!left.is_valid());
    assert!(!right.is_valid());

    let cut = a.intersect(&iv(3, 7));
    assert_eq!((cut.start(), cut.end()), (5, 7));
    let cut = a.intersect(&iv(4, 16));
    assert_eq!((cut.start(), cut.end()), (5, 15));
    assert!(!a.intersect(&iv(20, 30)).is_valid());

    let joined = a.union(&iv(3, 7));
    assert_eq!((joined.start(), joined.end()), (3, 15));
    let joined = a.union(&iv(4, 16));
    assert_eq!((joined.start(), joined.end()), (4, 16));
    assert!(!a.union(&iv(20, 30)).is_valid());
}

#[test]
fn empty_tree_is_safe() {
    let mut tree: IntervalTree<u64> = IntervalTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);

    assert!(!tree.search(iv(1, 2)).is_valid());
    assert!(!tree.search_offset(7).is_valid());
    assert!(!tree.remove(iv(1, 2)));
    assert_eq!(overlapping(&tree, iv(0, 100)), vec![]);
    assert!(tree.smallest().is_none());
    assert!(tree.largest().is_none());
    assert_eq!(tree.iter().count(), 0);

    tree.clear();
    assert!(tree.is_empty());
}

#[test]
fn inverted_bounds_are_rejected() {
    assert!(Interval::new(5u64, 3).is_err());
    assert!(Interval::<u64>::try_from(9..4).is_err());

    // Zero-length intervals are representable but never valid.
    let zero = Interval::new(4u64, 4).unwrap();
    assert!(!zero.is_valid());
    assert_eq!(zero.length(), 0);
}
