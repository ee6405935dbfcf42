//! A BST whose nodes live in a single slot table. Children are referred to by
//! slot index, and the slots of removed nodes are kept on a free list so the
//! next insertions reuse them instead of growing the table.
//!
//! Every operation is a loop over indices, so nothing here recurses no matter
//! how lopsided the insertion order makes the tree.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::arena::OrderedTree;
//!
//! let mut tree = OrderedTree::with_capacity(4);
//! tree.extend([2, 1, 3]);
//!
//! assert_eq!(tree.remove(&1), Some(1));
//! assert!(!tree.contains(&1));
//!
//! // The slot 1 occupied is handed to 4.
//! tree.insert(4);
//! assert!(tree.capacity() >= 4);
//!
//! let mut seen = Vec::new();
//! tree.traverse(|x| seen.push(*x));
//! assert_eq!(seen, [2, 3, 4]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::compare::{Compare, Natural};

/// An unbalanced Binary Search Tree over a comparator `C`, stored in a slot
/// table. Equal values are never stored twice: inserting one replaces the
/// stored value.
#[derive(Clone)]
pub struct OrderedTree<T, C = Natural> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    root: Option<usize>,
    len: usize,
    cmp: C,
}

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    left: Option<usize>,
    right: Option<usize>,
}

/// The link a node hangs from.
#[derive(Clone, Copy, Debug)]
enum Edge {
    Root,
    Left(usize),
    Right(usize),
}

impl<T: Ord> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> fmt::Debug for OrderedTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Generates a new, empty `OrderedTree` ordered by `T`'s own [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Generates a new, empty `OrderedTree` with room for `capacity` values
    /// before the slot table has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.slots.reserve(capacity);
        tree
    }
}

impl<T, C> OrderedTree<T, C>
where
    C: Compare<T>,
{
    /// Generates a new, empty `OrderedTree` ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Inserts `value`, overwriting an equal stored value in place. Returns
    /// `true` if a new node was created.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut edge = Edge::Root;
        while let Some(index) = self.link(edge) {
            match self.cmp.compare(&value, &self.node(index).value) {
                Ordering::Less => edge = Edge::Left(index),
                Ordering::Equal => {
                    self.node_mut(index).value = value;
                    trace_event!(len = self.len, "overwrote existing value");
                    return false;
                }
                Ordering::Greater => edge = Edge::Right(index),
            }
        }

        let index = self.alloc(Node {
            value,
            left: None,
            right: None,
        });
        self.set_link(edge, Some(index));
        self.len += 1;
        trace_event!(len = self.len, slot = index, "inserted node");
        true
    }

    /// Whether a value equal to `value` is stored.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Potentially finds the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let mut link = self.root;
        while let Some(index) = link {
            let node = self.node(index);
            match self.cmp.compare(value, &node.value) {
                Ordering::Less => link = node.left,
                Ordering::Equal => return Some(&node.value),
                Ordering::Greater => link = node.right,
            }
        }
        None
    }

    /// Removes the stored value equal to `value` and returns it. If the tree
    /// holds no such value nothing happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = [50, 30, 70, 20, 40].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&30), Some(30));
    /// assert_eq!(tree.remove(&30), None);
    ///
    /// let mut seen = Vec::new();
    /// tree.traverse(|x| seen.push(*x));
    /// assert_eq!(seen, [20, 40, 50, 70]);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let mut edge = Edge::Root;
        let index = loop {
            let Some(index) = self.link(edge) else {
                trace_event!(len = self.len, "remove missed");
                return None;
            };
            match self.cmp.compare(value, &self.node(index).value) {
                Ordering::Less => edge = Edge::Left(index),
                Ordering::Equal => break index,
                Ordering::Greater => edge = Edge::Right(index),
            }
        };

        let (left, right) = {
            let node = self.node(index);
            (node.left, node.right)
        };
        let removed = match (left, right) {
            (None, right) => {
                trace_event!(case = "no left child", slot = index, "removing value");
                self.set_link(edge, right);
                self.release(index).value
            }
            (left @ Some(_), None) => {
                trace_event!(case = "no right child", slot = index, "removing value");
                self.set_link(edge, left);
                self.release(index).value
            }
            (Some(_), Some(right)) => {
                trace_event!(case = "two children", slot = index, "removing value");
                // Walk to the leftmost node of the right subtree. It has no
                // left child so its right child takes its place.
                let mut successor_edge = Edge::Right(index);
                let mut successor = right;
                while let Some(left) = self.node(successor).left {
                    successor_edge = Edge::Left(successor);
                    successor = left;
                }
                let successor_right = self.node(successor).right;
                self.set_link(successor_edge, successor_right);

                let successor = self.release(successor).value;
                std::mem::replace(&mut self.node_mut(index).value, successor)
            }
        };
        self.len -= 1;
        Some(removed)
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Calls `visitor` on every value in ascending order.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&T),
    {
        let mut stack = Vec::new();
        let mut link = self.root;
        loop {
            while let Some(index) = link {
                stack.push(index);
                link = self.node(index).left;
            }
            let Some(index) = stack.pop() else {
                return;
            };
            let node = self.node(index);
            visitor(&node.value);
            link = node.right;
        }
    }

    /// The number of values stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of nodes on the longest path from the root to a leaf. An
    /// empty tree has a height of 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((index, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(index);
            stack.extend(node.left.map(|n| (n, depth + 1)));
            stack.extend(node.right.map(|n| (n, depth + 1)));
        }
        height
    }

    /// How many values the tree can hold before the slot table reallocates.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every stored value. The slot table keeps its allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    fn node(&self, index: usize) -> &Node<T> {
        self.slots[index]
            .as_ref()
            .expect("Linked slot must hold a node")
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        self.slots[index]
            .as_mut()
            .expect("Linked slot must hold a node")
    }

    fn link(&self, edge: Edge) -> Option<usize> {
        match edge {
            Edge::Root => self.root,
            Edge::Left(parent) => self.node(parent).left,
            Edge::Right(parent) => self.node(parent).right,
        }
    }

    fn set_link(&mut self, edge: Edge, child: Option<usize>) {
        match edge {
            Edge::Root => self.root = child,
            Edge::Left(parent) => self.node_mut(parent).left = child,
            Edge::Right(parent) => self.node_mut(parent).right = child,
        }
    }

    /// Stores `node` in a free slot, growing the table only if none is free.
    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Empties the slot at `index` and puts it on the free list. The caller
    /// must already have unlinked it.
    fn release(&mut self, index: usize) -> Node<T> {
        let node = self.slots[index]
            .take()
            .expect("Released slot must hold a node");
        self.free.push(index);
        node
    }
}

impl<T, C> Extend<T> for OrderedTree<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Clone, C>(tree: &OrderedTree<T, C>) -> Vec<T> {
        let mut values = Vec::new();
        tree.traverse(|v| values.push(v.clone()));
        values
    }

    /// Asserts the ordering invariant and that every occupied slot is either
    /// reachable from the root exactly once or on the free list.
    fn assert_well_formed<T: Ord>(tree: &OrderedTree<T>) {
        let mut reached = vec![false; tree.slots.len()];
        let mut stack: Vec<(usize, Option<&T>, Option<&T>)> = Vec::new();
        stack.extend(tree.root.map(|n| (n, None, None)));
        while let Some((index, low, high)) = stack.pop() {
            assert!(!reached[index], "slot {} linked twice", index);
            reached[index] = true;

            let node = tree.node(index);
            if let Some(low) = low {
                assert!(&node.value > low);
            }
            if let Some(high) = high {
                assert!(&node.value < high);
            }
            stack.extend(node.left.map(|n| (n, low, Some(&node.value))));
            stack.extend(node.right.map(|n| (n, Some(&node.value), high)));
        }

        for (index, slot) in tree.slots.iter().enumerate() {
            assert_eq!(slot.is_some(), reached[index]);
            assert_eq!(slot.is_none(), tree.free.contains(&index));
        }
        assert_eq!(reached.iter().filter(|r| **r).count(), tree.len());
    }

    fn tree_of(keys: &[i32]) -> OrderedTree<i32> {
        let tree: OrderedTree<i32> = keys.iter().copied().collect();
        assert_well_formed(&tree);
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: OrderedTree<i32> = OrderedTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.get(&3), None);
        assert!(values(&tree).is_empty());
    }

    #[test]
    fn sorted_input_is_a_spine() {
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        assert_eq!(tree.height(), 10);
        assert_eq!(values(&tree), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn insert_equal_overwrites_in_place() {
        let mut tree = OrderedTree::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        tree.extend([(5, 'a'), (3, 'b'), (7, 'c')]);

        assert!(!tree.insert((3, 'z')));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.slots.len(), 3);
        assert_eq!(tree.get(&(3, '?')), Some(&(3, 'z')));
    }

    #[test]
    fn delete_with_no_children() {
        let mut tree = tree_of(&[5, 3, 7]);

        assert_eq!(tree.remove(&3), Some(3));
        assert_well_formed(&tree);

        assert_eq!(tree.node(tree.root.unwrap()).left, None);
        assert_eq!(values(&tree), [5, 7]);
    }

    #[test]
    fn delete_with_null_left() {
        let mut tree = tree_of(&[5, 3, 7, 9, 8, 10]);
        let seven = tree.node(tree.root.unwrap()).right.unwrap();
        let nine = tree.node(seven).right.unwrap();

        assert_eq!(tree.remove(&7), Some(7));
        assert_well_formed(&tree);

        // 9 is relinked under 5 with its children untouched.
        assert_eq!(tree.node(tree.root.unwrap()).right, Some(nine));
        assert_eq!(tree.node(nine).left.map(|n| tree.node(n).value), Some(8));
        assert_eq!(values(&tree), [3, 5, 8, 9, 10]);
    }

    #[test]
    fn delete_with_null_right() {
        let mut tree = tree_of(&[5, 3, 7, 6]);

        assert_eq!(tree.remove(&7), Some(7));
        assert_well_formed(&tree);

        assert_eq!(values(&tree), [3, 5, 6]);
    }

    #[test]
    fn delete_with_null_right_keeps_subtree() {
        let mut tree = tree_of(&[10, 5, 15, 12, 11, 13]);
        let fifteen = tree.node(tree.root.unwrap()).right.unwrap();
        let twelve = tree.node(fifteen).left.unwrap();

        assert_eq!(tree.remove(&15), Some(15));
        assert_well_formed(&tree);

        // 12 is relinked under 10 with both of its children untouched.
        assert_eq!(tree.node(tree.root.unwrap()).right, Some(twelve));
        assert_eq!(tree.node(twelve).left.map(|n| tree.node(n).value), Some(11));
        assert_eq!(tree.node(twelve).right.map(|n| tree.node(n).value), Some(13));
        assert_eq!(tree.free, [fifteen]);
        assert_eq!(values(&tree), [5, 10, 11, 12, 13]);
    }

    #[test]
    fn delete_with_two_children_keeps_the_slot() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40]);
        let thirty = tree.node(tree.root.unwrap()).left.unwrap();

        assert_eq!(tree.remove(&30), Some(30));
        assert_well_formed(&tree);

        // 30's slot now holds 40, and 40's old slot is free.
        let replacement = tree.node(thirty);
        assert_eq!(replacement.value, 40);
        assert_eq!(replacement.right, None);
        assert_eq!(tree.node(replacement.left.unwrap()).value, 20);
        assert_eq!(tree.free, [4]);
        assert_eq!(values(&tree), [20, 40, 50, 70]);
    }

    #[test]
    fn delete_with_deeper_successor() {
        let mut tree = tree_of(&[5, 3, 8, 2, 6, 9, 7]);

        assert_eq!(tree.remove(&5), Some(5));
        assert_well_formed(&tree);

        assert_eq!(tree.node(tree.root.unwrap()).value, 6);
        assert_eq!(values(&tree), [2, 3, 6, 7, 8, 9]);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut tree = tree_of(&[5, 3, 7]);

        assert_eq!(tree.remove(&6), None);

        assert_eq!(tree.len(), 3);
        assert!(tree.free.is_empty());
        assert_eq!(values(&tree), [3, 5, 7]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = tree_of(&[5, 3, 7]);

        tree.remove(&3);
        tree.remove(&7);
        tree.insert(1);
        tree.insert(9);
        assert_well_formed(&tree);

        assert_eq!(tree.slots.len(), 3);
        assert!(tree.free.is_empty());

        tree.insert(4);
        assert_eq!(tree.slots.len(), 4);
    }

    #[test]
    fn clear_and_reuse() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.clear();

        assert!(tree.is_empty());
        assert!(!tree.contains(&2));

        tree.insert(4);
        assert_well_formed(&tree);
        assert_eq!(values(&tree), [4]);
    }
}

#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet`, tracking the
    /// most values the tree ever held at once.
    fn do_ops<T>(ops: &[Op<T>], bst: &mut OrderedTree<T>, set: &mut BTreeSet<T>) -> usize
    where
        T: Ord + Clone + std::fmt::Debug,
    {
        let mut peak = 0;
        for op in ops {
            match op {
                Op::Insert(v) => {
                    assert_eq!(bst.insert(v.clone()), set.insert(v.clone()));
                }
                Op::Remove(v) => {
                    assert_eq!(bst.remove(v), set.take(v));
                }
                Op::Traverse => {
                    let mut seen = Vec::new();
                    bst.traverse(|v| seen.push(v.clone()));
                    assert!(seen.iter().eq(set.iter()));
                }
            }
            assert_eq!(bst.len(), set.len());
            peak = peak.max(bst.len());
        }
        peak
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = OrderedTree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            set.iter().all(|v| tree.contains(v))
        }
    }

    quickcheck::quickcheck! {
        fn table_never_outgrows_peak_len(ops: Vec<Op<i8>>) -> bool {
            let mut tree = OrderedTree::new();
            let mut set = BTreeSet::new();

            let peak = do_ops(&ops, &mut tree, &mut set);
            tree.slots.len() == peak && tree.slots.len() == tree.len() + tree.free.len()
        }
    }
}
