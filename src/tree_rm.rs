//! Removal: splice, red-black repair and arena slot reclamation.

use crate::interval::Interval;
use crate::ix::IndexType;
use crate::{Color, IntervalTree};

impl<T: Ord + Copy + Default, Ix: IndexType> IntervalTree<T, Ix> {
    /// Removes the stored interval sharing `key`'s start offset. Returns
    /// `false` and leaves the tree untouched when no such interval exists.
    /// Takes *O(log N)*.
    pub fn remove(&mut self, key: Interval<T>) -> bool {
        let z = self.find(key.start());
        if z == Ix::NIL {
            return false;
        }

        // y is the node physically unlinked: z itself when z has a sentinel
        // child, otherwise the in-order successor, whose key then migrates
        // into z.
        let y = if self.node(z).left == Ix::NIL || self.node(z).right == Ix::NIL {
            z
        } else {
            self.minimum(self.node(z).right)
        };
        let x = if self.node(y).left != Ix::NIL {
            self.node(y).left
        } else {
            self.node(y).right
        };
        let y_parent = self.node(y).parent;
        let y_black = self.is_black(y);

        // Splice y out. The sentinel's parent is deliberately written when x
        // is NIL: fix_remove reaches the sibling through it.
        self.node_mut(x).parent = y_parent;
        if y_parent == Ix::NIL {
            self.root = x;
        } else if self.node(y_parent).left == y {
            self.node_mut(y_parent).left = x;
        } else {
            debug_assert!(self.node(y_parent).right == y, "broken parent link");
            self.node_mut(y_parent).right = x;
        }

        if y != z {
            let migrated = self.node(y).interval;
            self.node_mut(z).interval = migrated;
        }
        // Summaries must be correct before the fixup rotates anything. The
        // walk passes through z and folds in its migrated key.
        self.update_bounds_up(y_parent);

        if y_black {
            self.fix_remove(x);
        }
        self.release(y);
        true
    }

    /// Restores the black-height invariant after unlinking a black node.
    ///
    /// `x` carries the extra black. It may be the sentinel, in which case its
    /// transiently written parent link is how the loop reaches the sibling;
    /// the link is never read once this returns.
    fn fix_remove(&mut self, mut x: Ix) {
        while x != self.root && self.is_black(x) {
            let parent = self.node(x).parent;
            if x == self.node(parent).left {
                let mut w = self.node(parent).right;
                debug_assert!(w != Ix::NIL, "black height demands a sibling");
                if self.is_red(w) {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_left(parent);
                    w = self.node(self.node(x).parent).right;
                }
                let (near, far) = {
                    let sibling = self.node(w);
                    (sibling.left, sibling.right)
                };
                if self.is_black(near) && self.is_black(far) {
                    self.node_mut(w).color = Color::Red;
                    x = self.node(x).parent;
                } else {
                    if self.is_black(far) {
                        self.node_mut(near).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_right(w);
                        w = self.node(self.node(x).parent).right;
                    }
                    let parent = self.node(x).parent;
                    self.node_mut(w).color = self.node(parent).color;
                    self.node_mut(parent).color = Color::Black;
                    let far = self.node(w).right;
                    self.node_mut(far).color = Color::Black;
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut w = self.node(parent).left;
                debug_assert!(w != Ix::NIL, "black height demands a sibling");
                if self.is_red(w) {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_right(parent);
                    w = self.node(self.node(x).parent).left;
                }
                let (near, far) = {
                    let sibling = self.node(w);
                    (sibling.right, sibling.left)
                };
                if self.is_black(near) && self.is_black(far) {
                    self.node_mut(w).color = Color::Red;
                    x = self.node(x).parent;
                } else {
                    if self.is_black(far) {
                        self.node_mut(near).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_left(w);
                        w = self.node(self.node(x).parent).left;
                    }
                    let parent = self.node(x).parent;
                    self.node_mut(w).color = self.node(parent).color;
                    self.node_mut(parent).color = Color::Black;
                    let far = self.node(w).left;
                    self.node_mut(far).color = Color::Black;
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        // The sentinel is already black, so this write is a no-op for it.
        self.node_mut(x).color = Color::Black;
    }

    /// Frees the unlinked node's arena slot. The node occupying the last slot
    /// (when different) relocates into it, and every link that referred to
    /// the old position is re-pointed.
    fn release(&mut self, ix: Ix) {
        let last = self.nodes.len() - 1;
        self.nodes.swap_remove(ix.get());
        if ix.get() == last {
            return;
        }

        let old = Ix::new(last).unwrap();
        let (parent, left, right) = {
            let moved = self.node(ix);
            (moved.parent, moved.left, moved.right)
        };
        if parent == Ix::NIL {
            debug_assert!(self.root == old, "only the root may lack a parent");
            self.root = ix;
        } else {
            let parent_node = self.node_mut(parent);
            if parent_node.left == old {
                parent_node.left = ix;
            } else {
                debug_assert!(parent_node.right == old, "broken parent link");
                parent_node.right = ix;
            }
        }
        if left != Ix::NIL {
            self.node_mut(left).parent = ix;
        }
        if right != Ix::NIL {
            self.node_mut(right).parent = ix;
        }
    }
}
