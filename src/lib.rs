//! Augmented red-black interval tree over half-open intervals `[start, end)`.
//!
//! [`IntervalTree`] keys intervals by their start offset and stores at most
//! one interval per start. Every node caches the largest `end` and smallest
//! `start` found in its subtree, which lets
//! [`overlap_search`](IntervalTree::overlap_search) prune whole branches and
//! report all stored intervals overlapping a query in *O(log N + K)*.
//! Insertion and removal rebalance the tree and take *O(log N)*.
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use ivtree::{Interval, IntervalTree};
//!
//! # fn main() -> Result<(), ivtree::InvalidInterval> {
//! let mut tree = IntervalTree::new();
//! tree.insert(Interval::new(16u32, 20)?);
//! tree.insert(Interval::new(2, 8)?);
//! tree.insert(Interval::new(9, 15)?);
//!
//! let mut found = BTreeSet::new();
//! tree.overlap_search(&Interval::new(10, 17)?, &mut found);
//! let found: Vec<_> = found.into_iter().collect();
//! assert_eq!(found, vec![Interval::new(9, 15)?, Interval::new(16, 20)?]);
//!
//! assert!(tree.search_offset(2).is_valid());
//! assert!(!tree.search_offset(3).is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! # Index types
//!
//! Node links are arena indices of a pluggable [`IndexType`] (`u32` by
//! default). A tree of small coordinates can shrink its nodes further:
//!
//! ```rust
//! let mut tree: ivtree::IntervalTree<u16, u16> = ivtree::IntervalTree::default();
//! tree.insert(ivtree::Interval::new(10, 20).unwrap());
//! ```

mod interval;
mod iter;
mod ix;
mod tree_rm;
mod writer;

pub use interval::{Interval, InvalidInterval};
pub use iter::{IntoIter, Iter};
pub use ix::{DefaultIx, IndexType};

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Node color. New nodes are red; the sentinel leaf is permanently black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T: Ord + Copy, Ix: IndexType> {
    pub(crate) interval: Interval<T>,
    /// Largest `end` over the subtree rooted here.
    pub(crate) max: T,
    /// Smallest `start` over the subtree rooted here.
    pub(crate) min: T,
    pub(crate) parent: Ix,
    pub(crate) left: Ix,
    pub(crate) right: Ix,
    pub(crate) color: Color,
}

impl<T: Ord + Copy + Default, Ix: IndexType> Node<T, Ix> {
    /// The shared NIL leaf living in arena slot 0. Its `parent` field is
    /// transient scratch for the removal fixup and carries no meaning
    /// otherwise.
    fn sentinel() -> Self {
        Node {
            interval: Interval::default(),
            max: T::default(),
            min: T::default(),
            parent: Ix::NIL,
            left: Ix::NIL,
            right: Ix::NIL,
            color: Color::Black,
        }
    }

    fn new(interval: Interval<T>, parent: Ix) -> Self {
        Node {
            max: interval.end(),
            min: interval.start(),
            interval,
            parent,
            left: Ix::NIL,
            right: Ix::NIL,
            color: Color::Red,
        }
    }
}

/// Red-black tree of half-open intervals keyed by their start offset, with
/// per-node `max`/`min` subtree summaries for overlap pruning.
///
/// Nodes live in an arena `Vec`; slot 0 holds the shared NIL sentinel that
/// stands in for every absent child and the empty root.
#[derive(Clone)]
pub struct IntervalTree<T: Ord + Copy, Ix: IndexType = DefaultIx> {
    pub(crate) nodes: Vec<Node<T, Ix>>,
    pub(crate) root: Ix,
}

impl<T: Ord + Copy + Default> IntervalTree<T> {
    /// Creates an empty tree with the default index type.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Ord + Copy + Default, Ix: IndexType> Default for IntervalTree<T, Ix> {
    fn default() -> Self {
        IntervalTree {
            nodes: vec![Node::sentinel()],
            root: Ix::NIL,
        }
    }
}

impl<T: Ord + Copy + Default, Ix: IndexType> IntervalTree<T, Ix> {
    /// Creates an empty tree with room for `capacity` intervals.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::sentinel());
        IntervalTree { nodes, root: Ix::NIL }
    }

    /// Number of stored intervals.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns `true` if no intervals are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every interval. Keeps the allocated capacity.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.root = Ix::NIL;
    }

    /// Shrinks the node arena.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit()
    }

    /// Inserts `interval`, keyed by its start offset. Returns `false` and
    /// leaves the tree untouched when an interval with the same start is
    /// already stored. Takes *O(log N)*.
    pub fn insert(&mut self, interval: Interval<T>) -> bool {
        let mut parent = Ix::NIL;
        let mut cur = self.root;
        while cur != Ix::NIL {
            parent = cur;
            match interval.cmp(&self.node(cur).interval) {
                Ordering::Less => cur = self.node(cur).left,
                Ordering::Greater => cur = self.node(cur).right,
                Ordering::Equal => return false,
            }
        }

        let ix = match Ix::new(self.nodes.len()) {
            Ok(ix) => ix,
            Err(err) => panic!("{}", err),
        };
        self.nodes.push(Node::new(interval, parent));
        if parent == Ix::NIL {
            self.root = ix;
        } else if interval < self.node(parent).interval {
            self.node_mut(parent).left = ix;
        } else {
            self.node_mut(parent).right = ix;
        }

        // Summaries must be correct before the fixup rotates anything.
        self.update_bounds_up(parent);
        self.fix_insert(ix);
        true
    }

    /// Looks up the stored interval sharing `key`'s start offset. Returns the
    /// invalid default interval on a miss; callers distinguish the two with
    /// [`Interval::is_valid`]. The end bound of `key` is ignored.
    pub fn search(&self, key: Interval<T>) -> Interval<T> {
        self.search_offset(key.start())
    }

    /// Looks up the stored interval whose start equals `start`. Returns the
    /// invalid default interval on a miss.
    pub fn search_offset(&self, start: T) -> Interval<T> {
        let found = self.find(start);
        if found == Ix::NIL {
            Interval::default()
        } else {
            self.node(found).interval
        }
    }

    /// Returns `true` if an interval with `key`'s start offset is stored.
    pub fn contains(&self, key: Interval<T>) -> bool {
        self.find(key.start()) != Ix::NIL
    }

    /// Collects every stored interval overlapping `query` into `out`, which
    /// orders and deduplicates results by start offset.
    ///
    /// The traversal is iterative with an explicit stack and prunes subtrees
    /// through the `max`/`min` summaries. Both comparisons are strict because
    /// the intervals are half-open: a stored interval ending exactly at
    /// `query.start()`, or starting exactly at `query.end()`, does not
    /// overlap. Takes *O(log N + K)* for *K* matches.
    pub fn overlap_search(&self, query: &Interval<T>, out: &mut BTreeSet<Interval<T>>) {
        if self.root == Ix::NIL {
            return;
        }
        let mut stack = vec![self.root];
        while let Some(cur) = stack.pop() {
            let node = self.node(cur);
            if node.interval.overlaps(query) {
                out.insert(node.interval);
            }
            if node.left != Ix::NIL && self.node(node.left).max > query.start() {
                stack.push(node.left);
            }
            if node.right != Ix::NIL && self.node(node.right).min < query.end() {
                stack.push(node.right);
            }
        }
    }

    /// Returns the stored interval with the smallest start offset.
    /// Takes *O(log N)*. Returns `None` if the tree is empty.
    pub fn smallest(&self) -> Option<Interval<T>> {
        if self.root == Ix::NIL {
            return None;
        }
        Some(self.node(self.minimum(self.root)).interval)
    }

    /// Returns the stored interval with the largest start offset.
    /// Takes *O(log N)*. Returns `None` if the tree is empty.
    pub fn largest(&self) -> Option<Interval<T>> {
        if self.root == Ix::NIL {
            return None;
        }
        let mut cur = self.root;
        while self.node(cur).right != Ix::NIL {
            cur = self.node(cur).right;
        }
        Some(self.node(cur).interval)
    }

    /// In-order iterator over the stored intervals.
    pub fn iter(&self) -> Iter<'_, T, Ix> {
        Iter::new(self)
    }

    #[inline]
    pub(crate) fn node(&self, ix: Ix) -> &Node<T, Ix> {
        &self.nodes[ix.get()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, ix: Ix) -> &mut Node<T, Ix> {
        &mut self.nodes[ix.get()]
    }

    #[inline]
    pub(crate) fn is_red(&self, ix: Ix) -> bool {
        self.node(ix).color == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self, ix: Ix) -> bool {
        self.node(ix).color == Color::Black
    }

    /// Descends from the root comparing start offsets. Returns
    /// [`IndexType::NIL`] on a miss.
    pub(crate) fn find(&self, start: T) -> Ix {
        let mut cur = self.root;
        while cur != Ix::NIL {
            let node = self.node(cur);
            match start.cmp(&node.interval.start()) {
                Ordering::Less => cur = node.left,
                Ordering::Greater => cur = node.right,
                Ordering::Equal => break,
            }
        }
        cur
    }

    /// Leftmost node of the subtree rooted at `ix`.
    pub(crate) fn minimum(&self, mut ix: Ix) -> Ix {
        while self.node(ix).left != Ix::NIL {
            ix = self.node(ix).left;
        }
        ix
    }

    /// Recomputes the `max`/`min` summaries of `ix` from its key and children.
    /// Returns `true` when either value changed.
    fn recompute_bounds(&mut self, ix: Ix) -> bool {
        let node = self.node(ix);
        let (left, right) = (node.left, node.right);
        let mut max = node.interval.end();
        let mut min = node.interval.start();
        if left != Ix::NIL {
            let child = self.node(left);
            max = max.max(child.max);
            min = min.min(child.min);
        }
        if right != Ix::NIL {
            let child = self.node(right);
            max = max.max(child.max);
            min = min.min(child.min);
        }
        let node = self.node_mut(ix);
        let changed = node.max != max || node.min != min;
        node.max = max;
        node.min = min;
        changed
    }

    /// Recomputes summaries from `ix` up to the root unconditionally.
    pub(crate) fn update_bounds_up(&mut self, mut ix: Ix) {
        while ix != Ix::NIL {
            self.recompute_bounds(ix);
            ix = self.node(ix).parent;
        }
    }

    /// Recomputes summaries upward, stopping at the first ancestor whose
    /// values come out unchanged.
    fn refresh_bounds_up(&mut self, mut ix: Ix) {
        while ix != Ix::NIL && self.recompute_bounds(ix) {
            ix = self.node(ix).parent;
        }
    }

    /// Rotates left at `x`: its right child takes its place and `x` becomes
    /// that child's left child. Subtree summaries are re-aggregated from the
    /// rotated-down node upward.
    pub(crate) fn rotate_left(&mut self, x: Ix) {
        let y = self.node(x).right;
        debug_assert!(y != Ix::NIL, "rotation pivot missing");
        let y_left = self.node(y).left;
        self.node_mut(x).right = y_left;
        if y_left != Ix::NIL {
            self.node_mut(y_left).parent = x;
        }

        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        if parent == Ix::NIL {
            self.root = y;
        } else if self.node(parent).left == x {
            self.node_mut(parent).left = y;
        } else {
            self.node_mut(parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;

        // x lost a subtree, y gained one; above y the composition is
        // unchanged, so the upward walk stops at the first fixed point.
        self.recompute_bounds(x);
        self.recompute_bounds(y);
        let above = self.node(y).parent;
        self.refresh_bounds_up(above);
    }

    /// Mirror image of [`rotate_left`](IntervalTree::rotate_left).
    pub(crate) fn rotate_right(&mut self, x: Ix) {
        let y = self.node(x).left;
        debug_assert!(y != Ix::NIL, "rotation pivot missing");
        let y_right = self.node(y).right;
        self.node_mut(x).left = y_right;
        if y_right != Ix::NIL {
            self.node_mut(y_right).parent = x;
        }

        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        if parent == Ix::NIL {
            self.root = y;
        } else if self.node(parent).right == x {
            self.node_mut(parent).right = y;
        } else {
            self.node_mut(parent).left = y;
        }

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;

        self.recompute_bounds(x);
        self.recompute_bounds(y);
        let above = self.node(y).parent;
        self.refresh_bounds_up(above);
    }

    /// Restores the red-black properties after linking the red node `k`.
    fn fix_insert(&mut self, mut k: Ix) {
        while k != self.root && self.is_red(self.node(k).parent) {
            let parent = self.node(k).parent;
            let grand = self.node(parent).parent;
            debug_assert!(grand != Ix::NIL, "red parent must have a grandparent");
            if parent == self.node(grand).left {
                let uncle = self.node(grand).right;
                if self.is_red(uncle) {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    k = grand;
                } else {
                    if k == self.node(parent).right {
                        // Straighten the inner grandchild first.
                        k = parent;
                        self.rotate_left(k);
                    }
                    let parent = self.node(k).parent;
                    let grand = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.node(grand).left;
                if self.is_red(uncle) {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    k = grand;
                } else {
                    if k == self.node(parent).left {
                        k = parent;
                        self.rotate_right(k);
                    }
                    let parent = self.node(k).parent;
                    let grand = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    self.rotate_left(grand);
                }
            }
        }
        let root = self.root;
        self.node_mut(root).color = Color::Black;
    }
}

impl<T: Ord + Copy + Default, Ix: IndexType> IntoIterator for IntervalTree<T, Ix> {
    type Item = Interval<T>;
    type IntoIter = IntoIter<T, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T: Ord + Copy + Default, Ix: IndexType> IntoIterator for &'a IntervalTree<T, Ix> {
    type Item = Interval<T>;
    type IntoIter = Iter<'a, T, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a tree from intervals, silently skipping duplicate start offsets.
impl<T: Ord + Copy + Default> FromIterator<Interval<T>> for IntervalTree<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut tree = IntervalTree::new();
        for interval in iter {
            tree.insert(interval);
        }
        tree
    }
}

impl<T: Ord + Copy + Default + Debug, Ix: IndexType> Debug for IntervalTree<T, Ix> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut need_comma = false;
        for interval in self.iter() {
            if need_comma {
                write!(f, ", ")?;
            } else {
                need_comma = true;
            }
            write!(f, "{:?}", interval)?;
        }
        write!(f, "}}")
    }
}

/// Serialized as the in-order sequence of intervals.
#[cfg(feature = "serde")]
impl<T, Ix> Serialize for IntervalTree<T, Ix>
where
    T: Ord + Copy + Default + Serialize,
    Ix: IndexType,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Rebuilt by re-inserting the serialized intervals.
#[cfg(feature = "serde")]
impl<'de, T, Ix> Deserialize<'de> for IntervalTree<T, Ix>
where
    T: Ord + Copy + Default + Deserialize<'de>,
    Ix: IndexType,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let intervals = Vec::<Interval<T>>::deserialize(deserializer)?;
        let mut tree = IntervalTree::default();
        for interval in intervals {
            tree.insert(interval);
        }
        Ok(tree)
    }
}
