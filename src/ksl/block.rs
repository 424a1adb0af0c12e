//! Block storage for the key-sorted list.
//!
//! Blocks live in a [`BlockArena`] and refer to each other by [`BlockId`].
//! A block is either a leaf, whose entries carry values, or internal, whose
//! entries carry child block ids. Leaves are chained into a doubly-linked
//! list in key order.
//!
//! Every block owns an entry buffer with room for `max_fanout` entries,
//! reserved when the block is created. Entry shifts, splits, and merges
//! therefore never reallocate, and the only fallible step of a structural
//! change is creating the new block.

use std::ops::{Index, IndexMut};

use crate::error::KslError;

/// Identifies a block inside a [`BlockArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BlockId(usize);

/// What an entry points at.
#[derive(Debug)]
pub(crate) enum Payload<V> {
    /// A stored value (leaf entries).
    Value(V),
    /// The block below this separator (internal entries).
    Child(BlockId),
}

/// A key together with its value or child reference.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) payload: Payload<V>,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            payload: Payload::Value(value),
        }
    }

    #[inline]
    pub(crate) const fn internal(key: K, child: BlockId) -> Self {
        Self {
            key,
            payload: Payload::Child(child),
        }
    }

    /// Returns the child block of an internal entry.
    #[inline]
    pub(crate) fn child(&self) -> BlockId {
        match self.payload {
            Payload::Child(child) => child,
            Payload::Value(_) => unreachable!("value entry inside an internal block"),
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> Option<&V> {
        match &self.payload {
            Payload::Value(value) => Some(value),
            Payload::Child(_) => None,
        }
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> Option<&mut V> {
        match &mut self.payload {
            Payload::Value(value) => Some(value),
            Payload::Child(_) => None,
        }
    }
}

/// A fixed-capacity node of the tree.
#[derive(Debug)]
pub(crate) struct Block<K, V> {
    /// Entries sorted ascending by key.
    pub(crate) entries: Vec<Entry<K, V>>,
    pub(crate) leaf: bool,
    /// Previous leaf; always `None` for internal blocks.
    pub(crate) prev: Option<BlockId>,
    /// Next leaf; always `None` for internal blocks.
    pub(crate) next: Option<BlockId>,
}

impl<K, V> Block<K, V> {
    /// Allocates an empty block with room for `capacity` entries.
    pub(crate) fn try_new(leaf: bool, capacity: usize) -> Result<Self, KslError> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity)?;
        Ok(Self {
            entries,
            leaf,
            prev: None,
            next: None,
        })
    }

    /// Placeholder occupying a released arena slot. Holds no allocation.
    const fn vacant() -> Self {
        Self {
            entries: Vec::new(),
            leaf: true,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Key of the last entry, the maximum of this block's subtree.
    ///
    /// Only called on blocks that are known to be non-empty.
    #[inline]
    pub(crate) fn last_key(&self) -> &K {
        &self.entries[self.entries.len() - 1].key
    }

    /// Child referenced by the last entry of an internal block.
    #[inline]
    pub(crate) fn last_child(&self) -> BlockId {
        self.entries[self.entries.len() - 1].child()
    }
}

/// Owns every block of one tree.
///
/// Released slots are recycled. The arena keeps enough spare capacity in its
/// free list that releasing a block never allocates, so removal paths are
/// allocation-free.
#[derive(Debug)]
pub(crate) struct BlockArena<K, V> {
    slots: Vec<Block<K, V>>,
    vacant: Vec<BlockId>,
    live: usize,
    limit: Option<usize>,
}

impl<K, V> BlockArena<K, V> {
    pub(crate) const fn new(limit: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
            limit,
        }
    }

    /// Number of live blocks.
    #[inline]
    pub(crate) const fn live(&self) -> usize {
        self.live
    }

    /// Guarantees that the next `additional` calls to [`insert`](Self::insert)
    /// succeed without allocating.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), KslError> {
        if let Some(limit) = self.limit
            && self.live + additional > limit
        {
            tracing::debug!(live = self.live, additional, limit, "block budget exhausted");
            return Err(KslError::OutOfMemory);
        }
        let fresh = additional.saturating_sub(self.vacant.len());
        self.slots.try_reserve(fresh)?;
        let slot_total = self.slots.len() + fresh;
        self.vacant.try_reserve(slot_total - self.vacant.len())?;
        Ok(())
    }

    /// Stores `block` in a free slot. Callers must have reserved room first.
    pub(crate) fn insert(&mut self, block: Block<K, V>) -> BlockId {
        self.live += 1;
        if let Some(id) = self.vacant.pop() {
            self.slots[id.0] = block;
            id
        } else {
            let id = BlockId(self.slots.len());
            self.slots.push(block);
            id
        }
    }

    /// Releases the block at `id` and hands it back.
    pub(crate) fn remove(&mut self, id: BlockId) -> Block<K, V> {
        self.live -= 1;
        self.vacant.push(id);
        std::mem::replace(&mut self.slots[id.0], Block::vacant())
    }

    /// Returns the block at `id`, or `None` if the slot is out of range.
    ///
    /// Stale ids of released blocks resolve to an empty vacant block.
    #[inline]
    pub(crate) fn get(&self, id: BlockId) -> Option<&Block<K, V>> {
        self.slots.get(id.0)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block<K, V>> {
        self.slots.get_mut(id.0)
    }

    /// Borrows two distinct blocks mutably at once.
    pub(crate) fn pair_mut(
        &mut self,
        first: BlockId,
        second: BlockId,
    ) -> (&mut Block<K, V>, &mut Block<K, V>) {
        debug_assert_ne!(first, second);
        if first.0 < second.0 {
            let (head, tail) = self.slots.split_at_mut(second.0);
            (&mut head[first.0], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(first.0);
            (&mut tail[0], &mut head[second.0])
        }
    }

    /// Drops every block except `keep`, which is emptied, turned into a
    /// leaf, and returned under a fresh id. Never allocates.
    pub(crate) fn reset_to(&mut self, keep: BlockId) -> BlockId {
        let mut block = std::mem::replace(&mut self.slots[keep.0], Block::vacant());
        block.entries.clear();
        block.leaf = true;
        block.prev = None;
        block.next = None;
        self.slots.clear();
        self.vacant.clear();
        self.live = 1;
        self.slots.push(block);
        BlockId(0)
    }
}

impl<K, V> Index<BlockId> for BlockArena<K, V> {
    type Output = Block<K, V>;

    #[inline]
    fn index(&self, id: BlockId) -> &Self::Output {
        &self.slots[id.0]
    }
}

impl<K, V> IndexMut<BlockId> for BlockArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: BlockId) -> &mut Self::Output {
        &mut self.slots[id.0]
    }
}
