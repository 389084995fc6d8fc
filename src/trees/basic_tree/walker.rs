// This is a private module, so no documentation for it directly.
// instead look for documentation of the `BasicWalker` struct.

use super::*;
use recursive_reference::*;

/// A cursor that walks down a [`BasicTree`] from the root, and can replace the subtree
/// it is standing on.
///
/// Walking down a tree of boxes while keeping a mutable reference to the current subtree
/// doesn't pass the borrow checker with plain references. Internally,
/// [`recursive_reference::RecRef`] is used to hold the chain of references from the root
/// to the current position.
///
/// The walker may also be in an empty position, which is the son of a node but
/// doesn't contain a node by itself. Going down from an empty position fails.
pub struct BasicWalker<'a> {
    rec_ref: RecRef<'a, BasicTree>,
}

impl<'a> BasicWalker<'a> {
    pub fn new(tree: &'a mut BasicTree) -> BasicWalker<'a> {
        BasicWalker {
            rec_ref: RecRef::new(tree),
        }
    }

    pub fn node(&self) -> Option<&BasicNode> {
        self.rec_ref.node()
    }

    pub fn node_mut(&mut self) -> Option<&mut BasicNode> {
        self.rec_ref.node_mut()
    }

    /// Moves to the given son of the current node.
    /// Returns `Err(())` if the current position is empty.
    pub fn go_to(&mut self, side: Side) -> Result<(), ()> {
        RecRef::extend_result(&mut self.rec_ref, |tree| match tree.node_mut() {
            Some(node) => Ok(node.son_mut(side)),
            None => Err(()),
        })
    }

    /// Puts `tree` in the current position, and returns the subtree that was there.
    pub fn replace(&mut self, tree: BasicTree) -> BasicTree {
        std::mem::replace(&mut *self.rec_ref, tree)
    }
}

impl<'a> std::fmt::Debug for BasicWalker<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicWalker")
            .field("key", &self.node().map(|node| node.key))
            .finish()
    }
}
