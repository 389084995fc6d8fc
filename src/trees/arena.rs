//! An index arena for trees with parent links.
//!
//! Nodes that point to their parents can't be owned by their parents as well.
//! Instead, all of the nodes are owned by the arena, and links are [`NodeId`]s,
//! which are plain indices. Freed slots are reused by later allocations.

use std::ops::{Index, IndexMut};

/// A link to a node in an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

const FREED_NODE_ERROR: &str = "invariant violated: link to a freed node";

pub struct Arena<N> {
    slots: Vec<Option<N>>,
    free: Vec<NodeId>,
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Arena {
            slots: vec![],
            free: vec![],
        }
    }

    /// Stores the node and returns a link to it.
    pub fn alloc(&mut self, node: N) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Some(node));
            id
        }
    }

    /// Stores a node that needs to know its own link, e.g. to point at itself.
    pub fn alloc_with<F: FnOnce(NodeId) -> N>(&mut self, make: F) -> NodeId {
        let id = match self.free.last() {
            Some(&id) => id,
            None => NodeId(self.slots.len() as u32),
        };
        self.alloc(make(id))
    }

    /// Removes the node from the arena, and returns it.
    /// The link must not be used afterwards.
    pub fn free(&mut self, id: NodeId) -> N {
        let node = self.slots[id.index()].take().expect(FREED_NODE_ERROR);
        self.free.push(id);
        node
    }

    /// The number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the live nodes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i as u32), node)))
    }
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Arena::new()
    }
}

impl<N> Index<NodeId> for Arena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        self.slots[id.index()].as_ref().expect(FREED_NODE_ERROR)
    }
}

impl<N> IndexMut<NodeId> for Arena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        self.slots[id.index()].as_mut().expect(FREED_NODE_ERROR)
    }
}
