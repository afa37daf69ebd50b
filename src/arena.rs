use crate::error::InsertError;
use crate::tree::Node;

use std::ops::{Index, IndexMut};
use std::{fmt, mem};

/// The index of a node record inside an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A bump allocator over a caller-owned slice of node slots.
///
/// Slots are handed out in order and never reclaimed. The arena never grows:
/// once every slot is taken, allocation fails with
/// [`InsertError::BufferFull`].
pub struct Arena<'s, 'r, T> {
    slots: &'s mut [Node<'r, T>],
    len: usize,
}

impl<'s, 'r, T> Arena<'s, 'r, T> {
    /// Binds the arena to `slots`, resetting every slot.
    pub fn new(slots: &'s mut [Node<'r, T>]) -> Self {
        for slot in slots.iter_mut() {
            *slot = Node::default();
        }

        Arena { slots, len: 0 }
    }

    /// The size in bytes of a single node record.
    pub const fn record_size() -> usize {
        mem::size_of::<Node<'r, T>>()
    }

    /// The total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of slots in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is in use.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of free slots.
    pub fn remaining_slots(&self) -> usize {
        self.capacity() - self.len
    }

    /// The free space in bytes.
    pub fn remaining(&self) -> usize {
        self.remaining_slots() * Self::record_size()
    }

    pub(crate) fn alloc(&mut self, node: Node<'r, T>) -> Result<NodeId, InsertError> {
        let slot = self
            .slots
            .get_mut(self.len)
            .ok_or(InsertError::BufferFull)?;

        *slot = node;
        self.len += 1;
        Ok(NodeId(self.len - 1))
    }
}

impl<'r, T> Index<NodeId> for Arena<'_, 'r, T> {
    type Output = Node<'r, T>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.slots[id.0]
    }
}

impl<T> IndexMut<NodeId> for Arena<'_, '_, T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.slots[id.0]
    }
}

impl<T> fmt::Debug for Arena<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("record_size", &Self::record_size())
            .finish()
    }
}
