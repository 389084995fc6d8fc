//! Implementation of Red-Black trees.
//!
//! Nodes live in an [`Arena`] and point to their sons and to their parent by [`NodeId`].
//! All of the absent links point to a single sentinel node, which is always black.
//! This lets the rotations and the fixups read colors and parents of absent nodes
//! without special cases, as in the classic formulation of the algorithm.
//!
//! Deletion splices out the successor of a node with two sons and moves the successor node
//! into the deleted node's place, taking over its color.

use super::arena::*;
use super::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Red,
    Black,
}

pub use Color::*;

struct RbNode {
    key: Key,
    color: Color,
    left: NodeId,
    right: NodeId,
    parent: NodeId,
}

impl RbNode {
    /// A new red node with all links absent.
    fn new(key: Key, nil: NodeId) -> Self {
        RbNode {
            key,
            color: Red,
            left: nil,
            right: nil,
            parent: nil,
        }
    }
}

/// A Red-Black tree, counting its comparisons, link updates and rotations.
///
/// Each rotation costs exactly three pointer updates. The rest of the counting follows the
/// classic pseudo-code line by line: descents count two comparisons and one pointer update
/// per level, and `transplant` counts its root test, its side test and both links it writes.
pub struct RedBlackTree {
    nodes: Arena<RbNode>,
    root: NodeId,
    /// The sentinel. Owned by the arena like every other node, never freed.
    nil: NodeId,
    stats: Stats,
}

impl RedBlackTree {
    /// Creates an empty [`RedBlackTree`].
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let nil = nodes.alloc_with(|nil| RbNode {
            key: 0,
            color: Black,
            left: nil,
            right: nil,
            parent: nil,
        });
        RedBlackTree {
            nodes,
            root: nil,
            nil,
            stats: Stats::new(),
        }
    }

    /// The color of the root. The empty tree's root is the sentinel, which is black.
    pub fn root_color(&self) -> Color {
        self.color(self.root)
    }

    /// The color of the node holding `key`, if it is in the tree. Doesn't count anything.
    pub fn color_of(&self, key: Key) -> Option<Color> {
        let mut current = self.root;
        while current != self.nil {
            let node = &self.nodes[current];
            if key == node.key {
                return Some(node.color);
            }
            current = if key < node.key { node.left } else { node.right };
        }
        None
    }

    /// The number of black nodes on every path from the root down to the sentinel,
    /// the sentinel itself not included.
    pub fn black_height(&self) -> usize {
        let mut res = 0;
        let mut current = self.root;
        while current != self.nil {
            if self.color(current) == Black {
                res += 1;
            }
            current = self.nodes[current].left;
        }
        res
    }

    fn son(&self, x: NodeId, side: Side) -> NodeId {
        match side {
            Left => self.nodes[x].left,
            Right => self.nodes[x].right,
        }
    }

    fn set_son(&mut self, x: NodeId, side: Side, son: NodeId) {
        match side {
            Left => self.nodes[x].left = son,
            Right => self.nodes[x].right = son,
        }
    }

    fn parent(&self, x: NodeId) -> NodeId {
        self.nodes[x].parent
    }

    /// The sentinel's parent may be written too: `transplant` and the splice in `delete`
    /// use it to remember where an absent replacement node hangs.
    fn set_parent(&mut self, x: NodeId, parent: NodeId) {
        self.nodes[x].parent = parent;
    }

    fn color(&self, x: NodeId) -> Color {
        self.nodes[x].color
    }

    fn is_red(&self, x: NodeId) -> bool {
        self.color(x) == Red
    }

    /// The sentinel stays black whatever is asked of it.
    fn set_color(&mut self, x: NodeId, color: Color) {
        if x != self.nil {
            self.nodes[x].color = color;
        }
    }

    /// Which son of its parent `x` is. For the sentinel, this is relative to the parent
    /// it was last given.
    fn side_of(&self, x: NodeId) -> Side {
        if x == self.son(self.parent(x), Left) {
            Left
        } else {
            Right
        }
    }

    /// Rotates `x` down to the `dir` side, bringing its son on the other side up.
    /// `rotate(x, Left)` is the classic left rotation.
    fn rotate(&mut self, x: NodeId, dir: Side) {
        self.stats.rotate();
        let y = self.son(x, !dir);
        debug_assert!(y != self.nil, "rotating towards an absent son");
        let inner = self.son(y, dir);
        self.set_son(x, !dir, inner);
        if inner != self.nil {
            self.set_parent(inner, x);
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        if parent == self.nil {
            self.root = y;
        } else {
            let side = self.side_of(x);
            self.set_son(parent, side, y);
        }

        self.set_son(y, dir, x);
        self.set_parent(x, y);
        self.stats.update_n(3);
    }

    /// Finds the node holding `key`, or the sentinel.
    fn find(&mut self, key: Key) -> NodeId {
        let mut current = self.root;
        while current != self.nil {
            self.stats.compare();
            let node = &self.nodes[current];
            if key == node.key {
                return current;
            }
            self.stats.compare();
            self.stats.update();
            current = if key < node.key { node.left } else { node.right };
        }
        self.nil
    }

    fn minimum(&mut self, mut x: NodeId) -> NodeId {
        while self.nodes[x].left != self.nil {
            self.stats.compare();
            self.stats.update();
            x = self.nodes[x].left;
        }
        x
    }

    /// Puts the subtree `v` in `u`'s place. `v` may be the sentinel.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.parent(u);
        self.stats.compare();
        if parent == self.nil {
            self.stats.update();
            self.root = v;
        } else {
            self.stats.compare();
            self.stats.update();
            let side = self.side_of(u);
            self.set_son(parent, side, v);
        }
        self.stats.update();
        self.set_parent(v, parent);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.is_red(self.parent(z)) {
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            // the root is black, so a red parent is never the root
            debug_assert!(grandparent != self.nil, "red root");

            let side = self.side_of(parent);
            let uncle = self.son(grandparent, !side);
            if self.is_red(uncle) {
                // case 1: push the blackness down from the grandparent
                self.set_color(parent, Black);
                self.set_color(uncle, Black);
                self.set_color(grandparent, Red);
                z = grandparent;
            } else {
                if z == self.son(parent, !side) {
                    // case 2: inner grandson, rotate it to the outside
                    z = parent;
                    self.rotate(z, side);
                }
                // case 3: outer grandson
                let parent = self.parent(z);
                let grandparent = self.parent(parent);
                self.set_color(parent, Black);
                self.set_color(grandparent, Red);
                self.rotate(grandparent, !side);
            }
        }
        let root = self.root;
        self.set_color(root, Black);
    }

    /// `x` carries an extra black, and is either a node or the sentinel standing in
    /// for the removed node's absent son.
    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && !self.is_red(x) {
            let parent = self.parent(x);
            let side = if x == self.son(parent, Left) { Left } else { Right };
            let mut sibling = self.son(parent, !side);
            // the sibling's side has at least the doubly black node's black height
            debug_assert!(sibling != self.nil, "missing sibling of a doubly black node");

            if self.is_red(sibling) {
                // case 1: make the sibling black
                self.set_color(sibling, Black);
                self.set_color(parent, Red);
                self.rotate(parent, side);
                sibling = self.son(self.parent(x), !side);
            }

            if !self.is_red(self.son(sibling, Left)) && !self.is_red(self.son(sibling, Right)) {
                // case 2: move the extra black up
                self.set_color(sibling, Red);
                x = self.parent(x);
            } else {
                if !self.is_red(self.son(sibling, !side)) {
                    // case 3: get the red nephew to the far side
                    let near = self.son(sibling, side);
                    self.set_color(near, Black);
                    self.set_color(sibling, Red);
                    self.rotate(sibling, !side);
                    sibling = self.son(self.parent(x), !side);
                }
                // case 4
                let parent = self.parent(x);
                let parent_color = self.color(parent);
                self.set_color(sibling, parent_color);
                self.set_color(parent, Black);
                let far = self.son(sibling, !side);
                self.set_color(far, Black);
                self.rotate(parent, side);
                x = self.root;
            }
        }
        self.set_color(x, Black);
    }

    fn representation_of(&self, x: NodeId) -> String {
        if x == self.nil {
            return String::from("*");
        }
        let node = &self.nodes[x];
        let color = match node.color {
            Red => "R",
            Black => "B",
        };
        format!(
            "<{} {}{} {}>",
            self.representation_of(node.left),
            node.key,
            color,
            self.representation_of(node.right)
        )
    }
}

impl Default for RedBlackTree {
    fn default() -> Self {
        RedBlackTree::new()
    }
}

impl InstrumentedTree for RedBlackTree {
    const NAME: &'static str = "RB-BST";

    fn insert(&mut self, key: Key) {
        let mut parent = self.nil;
        let mut current = self.root;
        while current != self.nil {
            self.stats.compare_n(2);
            parent = current;
            let node = &self.nodes[current];
            if key == node.key {
                return; // no duplicates
            }
            self.stats.update();
            current = if key < node.key { node.left } else { node.right };
        }

        let z = self.nodes.alloc(RbNode::new(key, self.nil));
        self.stats.update();
        self.set_parent(z, parent);

        self.stats.compare();
        if parent == self.nil {
            self.stats.update();
            self.root = z;
        } else {
            self.stats.compare();
            self.stats.update();
            let side = if key < self.nodes[parent].key { Left } else { Right };
            self.set_son(parent, side, z);
        }
        // the new node's sons are the sentinel
        self.stats.update();

        self.insert_fixup(z);
    }

    fn delete(&mut self, key: Key) {
        let z = self.find(key);
        self.stats.compare();
        if z == self.nil {
            return;
        }

        let mut removed_color = self.color(z);
        let x;

        self.stats.compare();
        if self.son(z, Left) == self.nil {
            self.stats.update();
            x = self.son(z, Right);
            self.transplant(z, x);
        } else {
            self.stats.compare();
            if self.son(z, Right) == self.nil {
                self.stats.update();
                x = self.son(z, Left);
                self.transplant(z, x);
            } else {
                // two sons: the successor takes z's place
                let z_right = self.son(z, Right);
                let y = self.minimum(z_right);
                removed_color = self.color(y);
                self.stats.update();
                x = self.son(y, Right);

                self.stats.compare();
                if self.parent(y) == z {
                    self.stats.update();
                    self.set_parent(x, y);
                } else {
                    self.transplant(y, x);
                    self.stats.update_n(2);
                    let z_right = self.son(z, Right);
                    self.set_son(y, Right, z_right);
                    self.set_parent(z_right, y);
                }

                self.transplant(z, y);
                self.stats.update_n(3);
                let z_left = self.son(z, Left);
                self.set_son(y, Left, z_left);
                self.set_parent(z_left, y);
                let z_color = self.color(z);
                self.nodes[y].color = z_color;
            }
        }

        self.stats.compare();
        if removed_color == Black {
            self.delete_fixup(x);
        }
        self.nodes.free(z);
    }

    fn search(&mut self, key: Key) -> bool {
        self.find(key) != self.nil
    }

    fn height(&mut self) -> usize {
        let mut height = 0;
        let mut stack = vec![];
        if self.root != self.nil {
            stack.push((self.root, 1));
        }
        while let Some((x, depth)) = stack.pop() {
            height = std::cmp::max(height, depth);
            for &son in [self.nodes[x].left, self.nodes[x].right].iter() {
                if son != self.nil {
                    stack.push((son, depth + 1));
                }
            }
        }
        self.stats.height = height;
        height
    }

    fn in_order_keys(&self) -> Vec<Key> {
        let mut res = Vec::with_capacity(self.len());
        let mut stack = vec![];
        let mut current = self.root;
        loop {
            while current != self.nil {
                stack.push(current);
                current = self.nodes[current].left;
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
        // everything but the sentinel
        self.nodes.len() - 1
    }

    fn root_key(&self) -> Option<Key> {
        if self.root == self.nil {
            None
        } else {
            Some(self.nodes[self.root].key)
        }
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Asserts the search order, the parent links and the three coloring rules:
    /// the root is black, red nodes have black sons, and all paths from the root down
    /// to the sentinel pass through the same number of black nodes.
    fn assert_correctness(&self) {
        assert_eq!(self.color(self.nil), Black, "the sentinel must be black");
        let keys = self.in_order_keys();
        assert_ascending(&keys);
        assert_eq!(keys.len(), self.len(), "unreachable nodes in the arena");
        if self.root == self.nil {
            return;
        }
        assert_eq!(self.color(self.root), Black, "the root must be black");
        assert_eq!(self.parent(self.root), self.nil, "the root has a parent");

        let mut path_black_height = None;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((x, blacks)) = stack.pop() {
            for &side in [Left, Right].iter() {
                let son = self.son(x, side);
                if son == self.nil {
                    match path_black_height {
                        None => path_black_height = Some(blacks),
                        Some(expected) => assert_eq!(
                            blacks, expected,
                            "black heights differ below {}",
                            self.nodes[x].key
                        ),
                    }
                    continue;
                }
                assert_eq!(self.parent(son), x, "parent link of {} is broken", self.nodes[son].key);
                if self.is_red(x) {
                    assert!(!self.is_red(son), "red node {} has a red son", self.nodes[x].key);
                }
                let son_blacks = if self.is_red(son) { blacks } else { blacks + 1 };
                stack.push((son, son_blacks));
            }
        }
    }

    fn representation(&self) -> String {
        self.representation_of(self.root)
    }
}
