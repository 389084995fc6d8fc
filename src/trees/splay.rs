//! An implementation of a splay tree.
//!
//! Every access splays the node it ends at to the root: searches splay the found node, or
//! the last node visited when the key is missing; insertions splay the new node, and
//! deletions splay the deleted node up before removing it from the root.
//!
//! Nodes live in an [`Arena`] with parent links. There is no sentinel: absent links are
//! `None`.

use super::arena::*;
use super::*;

const MISSING_SON_ERROR: &str = "invariant violated: rotating towards an absent son";
const NO_PARENT_ERROR: &str = "invariant violated: a son without a parent";
const EMPTY_ROOT_ERROR: &str = "invariant violated: splaying emptied the tree";

struct SplayNode {
    key: Key,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

impl SplayNode {
    fn new(key: Key) -> Self {
        SplayNode {
            key,
            left: None,
            right: None,
            parent: None,
        }
    }
}

/// A splay tree, counting comparisons, link updates, rotations and splays.
///
/// A rotation counts six pointer updates, one for every link it may rewrite, and every
/// step of a splay counts one comparison for classifying the step. A splay that doesn't
/// move its node still counts as a splay.
#[derive(Default)]
pub struct SplayTree {
    nodes: Arena<SplayNode>,
    root: Option<NodeId>,
    stats: Stats,
}

impl SplayTree {
    /// Creates an empty [`SplayTree`].
    pub fn new() -> Self {
        Default::default()
    }

    fn son(&self, x: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Left => self.nodes[x].left,
            Right => self.nodes[x].right,
        }
    }

    fn set_son(&mut self, x: NodeId, side: Side, son: Option<NodeId>) {
        match side {
            Left => self.nodes[x].left = son,
            Right => self.nodes[x].right = son,
        }
    }

    fn parent(&self, x: NodeId) -> Option<NodeId> {
        self.nodes[x].parent
    }

    /// Which son `x` is, if it isn't the root.
    fn side_of(&self, x: NodeId) -> Option<Side> {
        let parent = self.parent(x)?;
        if self.nodes[parent].left == Some(x) {
            Some(Left)
        } else {
            Some(Right)
        }
    }

    /// Rotates `x` down to the `dir` side, bringing its son on the other side up.
    /// `rotate(x, Left)` is the classic left rotation.
    fn rotate(&mut self, x: NodeId, dir: Side) {
        self.stats.rotate();
        let y = self.son(x, !dir).expect(MISSING_SON_ERROR);
        let inner = self.son(y, dir);
        self.set_son(x, !dir, inner);
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }

        let parent = self.parent(x);
        self.nodes[y].parent = parent;
        match (parent, self.side_of(x)) {
            (Some(parent), Some(side)) => self.set_son(parent, side, Some(y)),
            _ => self.root = Some(y),
        }

        self.set_son(y, dir, Some(x));
        self.nodes[x].parent = Some(y);
        self.stats.update_n(6);
    }

    // if at the root, do nothing.
    // otherwise, do a splay step upwards.
    fn splay_step(&mut self, x: NodeId) {
        let (parent, x_side) = match (self.parent(x), self.side_of(x)) {
            (Some(parent), Some(side)) => (parent, side),
            _ => return, // already the root
        };
        self.stats.compare();

        let parent_side = match self.side_of(parent) {
            None => {
                // zig step: the parent is the root
                self.rotate(parent, !x_side);
                return;
            }
            Some(side) => side,
        };
        let grandparent = self.parent(parent).expect(NO_PARENT_ERROR);

        if x_side == parent_side {
            // zig-zig: the grandparent goes down first, then the parent
            self.rotate(grandparent, !x_side);
            self.rotate(parent, !x_side);
        } else {
            // zig-zag: x goes up twice, in opposite directions
            self.rotate(parent, !x_side);
            self.rotate(grandparent, x_side);
        }
    }

    /// Splays `x` to the root of the tree it is in.
    fn splay(&mut self, x: NodeId) {
        self.stats.splay();
        while self.parent(x).is_some() {
            self.splay_step(x);
        }
    }

    /// Looks for the key, and splays the node it ends at.
    /// Returns the node if the key was found. Otherwise the last node visited is splayed
    /// instead, and `None` is returned.
    fn access(&mut self, key: Key) -> Option<NodeId> {
        let mut current = self.root;
        let mut last = None;
        while let Some(x) = current {
            self.stats.compare();
            last = Some(x);
            let node = &self.nodes[x];
            if key == node.key {
                self.splay(x);
                return Some(x);
            }
            current = if key < node.key { node.left } else { node.right };
        }
        if let Some(last) = last {
            self.splay(last);
        }
        None
    }

    fn representation_of(&self, x: Option<NodeId>) -> String {
        match x {
            None => String::from("*"),
            Some(x) => {
                let node = &self.nodes[x];
                format!(
                    "<{} {} {}>",
                    self.representation_of(node.left),
                    node.key,
                    self.representation_of(node.right)
                )
            }
        }
    }
}

impl InstrumentedTree for SplayTree {
    const NAME: &'static str = "Splay";

    fn insert(&mut self, key: Key) {
        if self.root.is_none() {
            self.root = Some(self.nodes.alloc(SplayNode::new(key)));
            self.stats.update();
            return;
        }

        if self.access(key).is_some() {
            return; // no duplicates
        }

        // the search splayed a neighbor of the key to the root, so this descent is short
        let mut current = self.root.expect(EMPTY_ROOT_ERROR);
        let new = self.nodes.alloc(SplayNode::new(key));
        loop {
            self.stats.compare();
            let side = if key < self.nodes[current].key { Left } else { Right };
            match self.son(current, side) {
                Some(son) => current = son,
                None => {
                    self.set_son(current, side, Some(new));
                    self.nodes[new].parent = Some(current);
                    self.stats.update_n(2);
                    break;
                }
            }
        }
        self.splay(new);
    }

    fn delete(&mut self, key: Key) {
        let x = match self.access(key) {
            None => return,
            Some(x) => x,
        };
        debug_assert_eq!(self.root, Some(x));
        self.stats.update();

        let node = self.nodes.free(x);
        match (node.left, node.right) {
            (None, None) => self.root = None,
            (Some(son), None) | (None, Some(son)) => {
                self.root = Some(son);
                self.nodes[son].parent = None;
            }
            (Some(left), Some(right)) => {
                self.nodes[left].parent = None;
                self.nodes[right].parent = None;

                // the left subtree's maximum has no right son once it is the root
                self.root = Some(left);
                let mut max = left;
                while let Some(son) = self.nodes[max].right {
                    max = son;
                }
                self.splay(max);

                self.nodes[max].right = Some(right);
                self.nodes[right].parent = Some(max);
                self.stats.update_n(2);
            }
        }
    }

    fn search(&mut self, key: Key) -> bool {
        self.access(key).is_some()
    }

    fn height(&mut self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((x, depth)) = stack.pop() {
            height = std::cmp::max(height, depth);
            let node = &self.nodes[x];
            stack.extend(node.left.map(|son| (son, depth + 1)));
            stack.extend(node.right.map(|son| (son, depth + 1)));
        }
        self.stats.height = height;
        height
    }

    fn in_order_keys(&self) -> Vec<Key> {
        let mut res = Vec::with_capacity(self.len());
        let mut stack = vec![];
        let mut current = self.root;
        loop {
            while let Some(x) = current {
                stack.push(x);
                current = self.nodes[x].left;
            }
            match stack.pop() {
                None => break,
                Some(x) => {
                    res.push(self.nodes[x].key);
                    current = self.nodes[x].right;
                }
            }
        }
        res
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn root_key(&self) -> Option<Key> {
        self.root.map(|root| self.nodes[root].key)
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
        assert_eq!(keys.len(), self.len(), "unreachable nodes in the arena");
        if let Some(root) = self.root {
            assert_eq!(self.parent(root), None, "the root has a parent");
        }
        for (x, node) in self.nodes.iter() {
            for son in node.left.iter().chain(node.right.iter()) {
                assert_eq!(
                    self.parent(*son),
                    Some(x),
                    "parent link of {} is broken",
                    self.nodes[*son].key
                );
            }
        }
    }

    fn representation(&self) -> String {
        self.representation_of(self.root)
    }
}
