//! This crate exposes an ordered, comparison-keyed Binary Search Tree (BST)
//! in two storage layouts.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores one value and
//! will sometimes have child `Node`s. The most important invariants of a BST
//! are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a value takes `O(height)` where `height` is the longest path
//! from the root `Node` to a leaf `Node`. The trees here do not rebalance, so
//! the height depends entirely on insertion order: sorted input produces a
//! tree shaped like a linked list. Visiting the left subtree, then the
//! subtree root, then the right subtree yields the values in ascending order,
//! and that in-order walk ([`OrderedTree::traverse`]) is the only way to
//! enumerate a tree.
//!
//! ## Layouts
//!
//! - [`boxed`]: every node owns its children through a `Box`. Insertion and
//!   removal walk a mutable link down to the slot they change.
//! - [`arena`]: nodes live in one growable table and refer to their children
//!   by index. Removed slots are recycled, which suits high-churn workloads.
//!
//! Both order their values through a [`compare::Compare`] implementation, so a
//! record can be ordered by one of its fields only.
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//! for x in [50, 30, 70, 20, 40] {
//!     tree.insert(x);
//! }
//! tree.remove(&30);
//!
//! let mut seen = Vec::new();
//! tree.traverse(|x| seen.push(*x));
//! assert_eq!(seen, [20, 40, 50, 70]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

/// Emits a `trace` level event when the `tracing` feature is enabled and
/// compiles to nothing otherwise.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

pub mod arena;
pub mod boxed;
pub mod compare;

pub use boxed::OrderedTree;
