//! A BST whose nodes own their children through `Box`es. There are no parent
//! pointers: every operation walks a `&mut` link down from the root, and
//! removal relinks the matched slot in place. Nothing recurses, so a
//! degenerate (list-shaped) tree costs time but never stack.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::boxed::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! assert!(tree.insert(1));
//! assert!(tree.contains(&1));
//!
//! // Inserting an equal value overwrites instead of adding a node.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.len(), 1);
//!
//! // Removing hands back the stored value.
//! assert_eq!(tree.remove(&1), Some(1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::compare::{Compare, Natural};

type Link<T> = Option<Box<Node<T>>>;

/// An unbalanced Binary Search Tree over a comparator `C`. Equal values are
/// never stored twice: inserting one replaces the stored value.
pub struct OrderedTree<T, C = Natural> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

impl<T: Ord> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for OrderedTree<T, C> {
    fn drop(&mut self) {
        drop_subtree(self.root.take());
    }
}

/// Dropping a `Box<Node>` recurses once per level. Detach children onto a
/// stack instead so list-shaped trees don't blow the call stack.
fn drop_subtree<T>(link: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<T, C> Clone for OrderedTree<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: clone_subtree(self.root.as_deref()),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<T, C> fmt::Debug for OrderedTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("len", &self.len)
            .field("values", &InOrder(self))
            .finish()
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Generates a new, empty `OrderedTree` ordered by `T`'s own [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> OrderedTree<T, C>
where
    C: Compare<T>,
{
    /// Generates a new, empty `OrderedTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::boxed::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 3, 2]);
    ///
    /// let mut descending = Vec::new();
    /// tree.traverse(|x| descending.push(*x));
    /// assert_eq!(descending, [3, 2, 1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Inserts `value`. If an equal value is already stored it is overwritten
    /// in place and the shape of the tree doesn't change.
    ///
    /// Returns `true` if a new node was created and `false` if an existing
    /// value was overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::boxed::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert!(tree.insert("Noah Miller"));
    /// assert!(!tree.insert("Noah Miller"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match self.cmp.compare(&value, &node.value) {
                Ordering::Less => &mut node.left,
                Ordering::Equal => {
                    node.value = value;
                    trace_event!(len = self.len, "overwrote existing value");
                    return false;
                }
                Ordering::Greater => &mut node.right,
            };
        }
        *link = Some(Node::new_boxed(value));
        self.len += 1;
        trace_event!(len = self.len, "inserted node");
        true
    }

    /// Whether a value equal to `value` is stored.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Potentially finds the stored value equal to `value`. The probe only
    /// has to carry whatever the comparator looks at.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::boxed::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_comparator(|a: &(&str, u16), b: &(&str, u16)| a.0.cmp(b.0));
    /// tree.insert(("Liam Davis", 2022));
    ///
    /// assert_eq!(tree.get(&("Liam Davis", 0)), Some(&("Liam Davis", 2022)));
    /// assert_eq!(tree.get(&("Ava Taylor", 0)), None);
    /// ```
    pub fn get(&self, value: &T) -> Option<&T> {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            match self.cmp.compare(value, &node.value) {
                Ordering::Less => link = node.left.as_deref(),
                Ordering::Equal => return Some(&node.value),
                Ordering::Greater => link = node.right.as_deref(),
            }
        }
        None
    }

    /// Removes the stored value equal to `value` and returns it. If the tree
    /// holds no such value nothing happens and `None` is returned.
    ///
    /// A node with two children keeps its place in the tree: it takes over the
    /// value of its in-order successor, and the successor's node is unlinked
    /// instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::boxed::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = [50, 30, 70, 20, 40].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&30), Some(30));
    /// assert_eq!(tree.remove(&30), None);
    /// assert_eq!(tree.len(), 4);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let mut link = &mut self.root;
        loop {
            let Some(node) = link.as_deref() else {
                trace_event!(len = self.len, "remove missed");
                return None;
            };
            link = match self.cmp.compare(value, &node.value) {
                Ordering::Less => &mut link.as_mut().expect("Compared node is present").left,
                Ordering::Equal => break,
                Ordering::Greater => &mut link.as_mut().expect("Compared node is present").right,
            };
        }

        let removed = Node::unlink(link, &self.cmp);
        self.len -= 1;
        Some(removed)
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Calls `visitor` on every value in ascending order: the left subtree,
    /// then the node, then the right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::boxed::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = ["b", "c", "a"].into_iter().collect();
    ///
    /// let mut listing = String::new();
    /// tree.traverse(|name| listing.push_str(name));
    /// assert_eq!(listing, "abc");
    /// ```
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&T),
    {
        let mut stack = Vec::new();
        let mut link = self.root.as_deref();
        loop {
            while let Some(node) = link {
                stack.push(node);
                link = node.left.as_deref();
            }
            let Some(node) = stack.pop() else {
                return;
            };
            visitor(&node.value);
            link = node.right.as_deref();
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
        let mut stack: Vec<(&Node<T>, usize)> =
            self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Drops every stored value.
    pub fn clear(&mut self) {
        drop_subtree(self.root.take());
        self.len = 0;
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

struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: None,
            right: None,
        })
    }

    /// Takes the value out of the node at `link`, which must be occupied, and
    /// rewrites `link` so the rest of the subtree stays ordered.
    fn unlink<C>(link: &mut Link<T>, cmp: &C) -> T
    where
        C: Compare<T>,
    {
        let mut node = link.take().expect("Unlinked node is present");
        match (node.left.take(), node.right.take()) {
            (None, right) => {
                trace_event!(case = "no left child", "removing value");
                *link = right;
                node.value
            }
            (left @ Some(_), None) => {
                trace_event!(case = "no right child", "removing value");
                *link = left;
                node.value
            }
            (left @ Some(_), mut right @ Some(_)) => {
                trace_event!(case = "two children", "removing value");
                let successor = Self::take_min(&mut right);
                let removed = std::mem::replace(&mut node.value, successor);

                debug_assert!(left
                    .as_deref()
                    .map_or(true, |l| cmp.compare(&l.value, &node.value) == Ordering::Less));
                debug_assert!(right
                    .as_deref()
                    .map_or(true, |r| cmp.compare(&r.value, &node.value) == Ordering::Greater));
                node.left = left;
                node.right = right;
                *link = Some(node);
                removed
            }
        }
    }

    /// Unlinks the leftmost node of the non-empty subtree at `link` and returns
    /// its value. Its right subtree takes its place.
    fn take_min(mut link: &mut Link<T>) -> T {
        while link.as_deref().map_or(false, |n| n.left.is_some()) {
            link = &mut link.as_mut().expect("Checked above").left;
        }
        let min = link.take().expect("Non-empty subtree has a minimum");
        let Node { value, right, .. } = *min;
        *link = right;
        value
    }
}

/// Copies the subtree under `root` without recursing: children are built
/// before their parent, so every finished subtree waits on `built`.
fn clone_subtree<T: Clone>(root: Option<&Node<T>>) -> Link<T> {
    enum Step<'a, T> {
        Visit(&'a Node<T>),
        Build(&'a Node<T>),
    }

    let mut stack: Vec<Step<'_, T>> = root.map(Step::Visit).into_iter().collect();
    let mut built: Vec<Box<Node<T>>> = Vec::new();
    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(node) => {
                stack.push(Step::Build(node));
                stack.extend(node.right.as_deref().map(Step::Visit));
                stack.extend(node.left.as_deref().map(Step::Visit));
            }
            Step::Build(node) => {
                let right = node.right.as_ref().and_then(|_| built.pop());
                let left = node.left.as_ref().and_then(|_| built.pop());
                built.push(Box::new(Node {
                    value: node.value.clone(),
                    left,
                    right,
                }));
            }
        }
    }
    built.pop()
}

/// Lists a tree's values in order for `Debug`.
struct InOrder<'a, T, C>(&'a OrderedTree<T, C>);

impl<T: fmt::Debug, C> fmt::Debug for InOrder<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.0.traverse(|value| {
            list.entry(value);
        });
        list.finish()
    }
}
