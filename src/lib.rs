//! Instrumented search trees.
//!
//! An unbalanced binary search tree, a Red-Black tree and a splay tree, all counting the
//! key comparisons, link updates, rotations and splays they perform, and a harness that
//! measures them over many sizes and insertion orders in parallel.
//!
//! ```
//! use instrumented_trees::*;
//!
//! let mut tree = SplayTree::new();
//! for key in [5, 3, 8, 1].iter() {
//!     tree.insert(*key);
//! }
//! assert!(tree.search(5));
//! assert_eq!(tree.root_key(), Some(5));
//! assert!(tree.stats().splays > 0);
//! ```

#[macro_use]
extern crate derive_destructure;

pub mod bench;
pub mod error;
pub mod stats;
pub mod trees;

pub use error::{BenchError, BenchResult};
pub use stats::*;
pub use trees::{basic_tree::UnbalancedTree, red_black::RedBlackTree, splay::SplayTree};
pub use trees::{InstrumentedTree, Key, Side};
