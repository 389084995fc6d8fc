//! The basic tree module
//! This module implements the unbalanced search tree.
//!
//! Nodes own their sons through boxes, and there are no parent links. Insertion and
//! deletion walk down from the root with a [`BasicWalker`], and never restructure the
//! tree beyond the single position they change.

// not public, merely a separate file for the walker
mod walker;

pub use walker::*;

use super::*;

const NO_VALUE_ERROR: &str = "invariant violated: walked into an empty subtree";

/// A basic tree. might be empty.
pub enum BasicTree {
    Empty,
    Root(Box<BasicNode>),
}
use BasicTree::*;

impl BasicTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Empty
    }

    /// Creates a tree with a single node.
    pub fn leaf(key: Key) -> Self {
        Root(Box::new(BasicNode::new(key)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Empty)
    }

    pub fn node(&self) -> Option<&BasicNode> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    pub fn node_mut(&mut self) -> Option<&mut BasicNode> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    pub fn into_node_boxed(self) -> Option<Box<BasicNode>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    /// Used for debugging. Prints a representation of the tree, like so:
    /// `<<* 1 *> 2 *>`.
    /// Each pair of triangle brackets is a node, and `*` denotes empty trees.
    /// Recursive, so it should only be used on small trees.
    pub fn representation(&self) -> String {
        match self {
            Empty => String::from("*"),
            Root(node) => format!(
                "<{} {} {}>",
                node.left.representation(),
                node.key,
                node.right.representation()
            ),
        }
    }
}

impl Default for BasicTree {
    fn default() -> Self {
        BasicTree::new()
    }
}

/// A basic node. can be viewed as a non-empty basic tree: it always has a key.
pub struct BasicNode {
    pub key: Key,
    pub left: BasicTree,
    pub right: BasicTree,
}

impl BasicNode {
    pub fn new(key: Key) -> BasicNode {
        BasicNode {
            key,
            left: Empty,
            right: Empty,
        }
    }

    pub fn son(&self, side: Side) -> &BasicTree {
        match side {
            Left => &self.left,
            Right => &self.right,
        }
    }

    pub fn son_mut(&mut self, side: Side) -> &mut BasicTree {
        match side {
            Left => &mut self.left,
            Right => &mut self.right,
        }
    }

    /// The smallest key in this node's subtree.
    /// Every step to the left counts a comparison and a pointer update.
    fn min_key(&self, stats: &mut Stats) -> Key {
        let mut node = self;
        while let Some(left) = node.left.node() {
            stats.compare();
            stats.update();
            node = left;
        }
        node.key
    }
}

/// The unbalanced search tree.
///
/// The counting follows the textbook recursive formulation: every level visited by an insert
/// or a delete costs a comparison for testing whether the subtree is empty, and another for
/// choosing the direction, and every step down costs a pointer update, for relinking the son
/// on the way back up.
#[derive(Default)]
pub struct UnbalancedTree {
    tree: BasicTree,
    stats: Stats,
    len: usize,
}

impl UnbalancedTree {
    /// Creates an empty [`UnbalancedTree`].
    pub fn new() -> Self {
        Default::default()
    }
}

impl InstrumentedTree for UnbalancedTree {
    const NAME: &'static str = "BST";

    fn insert(&mut self, key: Key) {
        let UnbalancedTree { tree, stats, len } = self;
        let mut walker = BasicWalker::new(tree);
        loop {
            stats.compare();
            let node_key = match walker.node() {
                None => break,
                Some(node) => node.key,
            };
            stats.compare();
            let side = match key.cmp(&node_key) {
                std::cmp::Ordering::Less => Left,
                std::cmp::Ordering::Greater => Right,
                std::cmp::Ordering::Equal => return, // no duplicates
            };
            stats.update();
            walker.go_to(side).expect(NO_VALUE_ERROR);
        }
        stats.update();
        walker.replace(BasicTree::leaf(key));
        *len += 1;
    }

    fn delete(&mut self, key: Key) {
        let UnbalancedTree { tree, stats, len } = self;
        let mut walker = BasicWalker::new(tree);
        // the key currently being removed. changes to the successor's key when
        // a node with two sons takes over its successor's key.
        let mut target = key;
        loop {
            stats.compare();
            let node = match walker.node_mut() {
                None => return,
                Some(node) => node,
            };
            stats.compare();
            let side = match target.cmp(&node.key) {
                std::cmp::Ordering::Less => Left,
                std::cmp::Ordering::Greater => Right,
                std::cmp::Ordering::Equal => {
                    stats.update();
                    stats.compare();
                    if node.left.is_empty() {
                        stats.update();
                        let right = std::mem::take(&mut node.right);
                        walker.replace(right);
                        *len -= 1;
                        return;
                    } else if node.right.is_empty() {
                        stats.update();
                        let left = std::mem::take(&mut node.left);
                        walker.replace(left);
                        *len -= 1;
                        return;
                    }

                    // two sons: take over the successor's key,
                    // then remove the successor from the right subtree
                    let successor = node.right.node().expect(NO_VALUE_ERROR).min_key(stats);
                    stats.update();
                    node.key = successor;
                    target = successor;
                    Right
                }
            };
            stats.update();
            walker.go_to(side).expect(NO_VALUE_ERROR);
        }
    }

    fn search(&mut self, key: Key) -> bool {
        let UnbalancedTree { tree, stats, .. } = self;
        let mut current: &BasicTree = tree;
        while let Some(node) = current.node() {
            stats.compare();
            if key == node.key {
                return true;
            }
            stats.compare();
            current = node.son(if key < node.key { Left } else { Right });
        }
        false
    }

    fn height(&mut self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&BasicNode, usize)> =
            self.tree.node().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(left) = node.left.node() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.node() {
                stack.push((right, depth + 1));
            }
        }
        self.stats.height = height;
        height
    }

    fn in_order_keys(&self) -> Vec<Key> {
        let mut res = Vec::with_capacity(self.len);
        let mut stack: Vec<&BasicNode> = vec![];
        let mut current = &self.tree;
        loop {
            while let Some(node) = current.node() {
                stack.push(node);
                current = &node.left;
            }
            match stack.pop() {
                None => break,
                Some(node) => {
                    res.push(node.key);
                    current = &node.right;
                }
            }
        }
        res
    }

    fn len(&self) -> usize {
        self.len
    }

    fn root_key(&self) -> Option<Key> {
        self.tree.node().map(|node| node.key)
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn assert_correctness(&self) {
        let keys = self.in_order_keys();
        assert_ascending(&keys);
        assert_eq!(keys.len(), self.len, "stored length doesn't match the tree");
    }

    fn representation(&self) -> String {
        self.tree.representation()
    }
}

/// Replaces the tree with an empty tree, and deallocates the old one iteratively.
///
/// The auto-generated drop of [`BasicTree`] is recursive, and an unbalanced tree built
/// from sorted keys is a single path, so dropping a large one that way overflows the stack.
pub fn deallocate_iteratively(tree: &mut BasicTree) {
    let mut pending: Vec<Box<BasicNode>> =
        std::mem::take(tree).into_node_boxed().into_iter().collect();
    while let Some(mut node) = pending.pop() {
        for son in [std::mem::take(&mut node.left), std::mem::take(&mut node.right)] {
            pending.extend(son.into_node_boxed());
        }
    }
}

impl Drop for UnbalancedTree {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[Key]) -> UnbalancedTree {
        let mut tree = UnbalancedTree::new();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    #[test]
    fn ascending_inserts_make_a_path() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.in_order_keys(), vec![1, 2, 3]);
        assert_eq!(tree.representation(), "<* 1 <* 2 <* 3 *>>>");
        assert_eq!(tree.stats().height, 3);
    }

    #[test]
    fn insert_counts_follow_the_recursion() {
        let mut tree = UnbalancedTree::new();
        tree.insert(5);
        // empty root: one emptiness test and one link
        assert_eq!(tree.stats().comparisons, 1);
        assert_eq!(tree.stats().pointer_updates, 1);

        tree.reset_stats();
        tree.insert(3);
        // root level: 2 comparisons + 1 update, then the empty slot: 1 + 1
        assert_eq!(tree.stats().comparisons, 3);
        assert_eq!(tree.stats().pointer_updates, 2);

        tree.reset_stats();
        tree.insert(3);
        // duplicate: 2 levels visited, one step down, nothing attached
        assert_eq!(tree.stats().comparisons, 4);
        assert_eq!(tree.stats().pointer_updates, 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn delete_with_two_sons_copies_the_successor() {
        let mut tree = tree_of(&[5, 3, 8, 7, 9, 6]);
        tree.reset_stats();
        tree.delete(5);
        // the root node survives, holding the successor's key
        assert_eq!(tree.root_key(), Some(6));
        assert_eq!(tree.in_order_keys(), vec![3, 6, 7, 8, 9]);
        tree.assert_correctness();
        // root: 2 + 1 (match), min search over 8 -> 7 -> 6: 2 steps,
        // then successor removal: 8 (2), 7 (2), 6 (2 + 1)
        assert_eq!(tree.stats().comparisons, 3 + 2 + 2 + 2 + 3);
        // root: match 1 + min 2 + copy 1 + descend 1, 8: 1, 7: 1, 6: match 1 + splice 1
        assert_eq!(tree.stats().pointer_updates, 1 + 2 + 1 + 1 + 1 + 1 + 2);
    }

    #[test]
    fn missing_keys_are_noops() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.reset_stats();
        tree.delete(4);
        assert!(tree.stats().comparisons > 0);
        assert_eq!(tree.in_order_keys(), vec![1, 2, 3]);
        assert!(!tree.search(4));
        assert!(tree.search(3));
    }

    #[test]
    fn deep_trees_drop_without_overflow() {
        // build a long path by hand to keep the test fast
        let mut path = BasicTree::new();
        for key in (0..200_000).rev() {
            let mut node = BasicNode::new(key);
            node.right = path;
            path = Root(Box::new(node));
        }
        let mut tree = UnbalancedTree::new();
        tree.tree = path;
        tree.len = 200_000;
        assert_eq!(tree.height(), 200_000);
        assert_eq!(tree.in_order_keys().len(), 200_000);
        drop(tree);
    }
}
