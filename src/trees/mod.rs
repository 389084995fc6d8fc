//! The three instrumented search trees, and the interface they share.
//!
//! All trees store distinct `i64` keys, and count the work they do in a [`Stats`].
//! The trees are single owner and single threaded; nothing in them is `Sync`-shared.

pub mod arena;
pub mod basic_tree;
pub mod red_black;
pub mod splay;

pub use crate::stats::{OperationStats, Stats};

/// The key type stored in all the trees.
pub type Key = i64;

/// Which son of a node. Used to write mirrored cases once.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Side {
    Left,
    Right,
}

pub use Side::*;

impl std::ops::Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Left => Right,
            Right => Left,
        }
    }
}

/// The operations shared by all of the instrumented trees.
///
/// Every operation is total: deleting or searching a missing key, and inserting a key that
/// is already present, are no-ops as far as the key set is concerned. They still do (and
/// count) the work needed to find that out.
pub trait InstrumentedTree: Default {
    /// The name used in logs and reports.
    const NAME: &'static str;

    /// Inserts the key. Does nothing if it is already present.
    fn insert(&mut self, key: Key);

    /// Deletes the key. Does nothing if it is not present.
    fn delete(&mut self, key: Key);

    /// Returns whether the key is in the tree.
    /// Takes `&mut self` since some trees restructure on lookups.
    fn search(&mut self, key: Key) -> bool;

    /// Computes the height of the tree (`0` for the empty tree, `1` for a single node),
    /// and records it as the last computed height in the tree's [`Stats`].
    fn height(&mut self) -> usize;

    /// All of the keys, in ascending order.
    fn in_order_keys(&self) -> Vec<Key>;

    /// The number of keys in the tree.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The key at the root, if the tree isn't empty.
    fn root_key(&self) -> Option<Key>;

    fn stats(&self) -> &Stats;

    /// Zeroes the counters, without touching the tree.
    fn reset_stats(&mut self);

    /// Checks every structural invariant of the tree. Panics if any of them is broken.
    fn assert_correctness(&self);

    /// Used for debugging. Prints a representation of the tree, like so:
    /// `<<* 1 *> 2 *>`.
    /// Each pair of triangle brackets is a node, and `*` denotes empty trees.
    /// Trees may add per-node markers (e.g. colors).
    fn representation(&self) -> String;
}

/// Panics if the keys aren't strictly ascending.
pub(crate) fn assert_ascending(keys: &[Key]) {
    for pair in keys.windows(2) {
        assert!(
            pair[0] < pair[1],
            "search tree order violated: {} is not before {}",
            pair[0],
            pair[1]
        );
    }
}
