//! Bounded, ordered cache set.
//!
//! A set keeps its blocks in a deque ordered from the newest end (front,
//! position 0) to the oldest end (back). What "newest" means is decided by the
//! replacement policy: recency for LRU and Optimal, insertion time for FIFO.
//! Fills always enter at the front, so the block just inserted sits at
//! position 0 until the eviction step that restores capacity has run.
//!
//! # Performance
//!
//! - `position()`: O(W) scan where W is the associativity
//! - `promote()`: O(W) (remove + push_front)
//! - `push_newest()`: O(1)

use std::collections::VecDeque;

use super::Block;

/// One set of a cache level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSet {
    blocks: VecDeque<Block>,
    capacity: usize,
}

impl CacheSet {
    /// Creates an empty set holding at most `capacity` blocks.
    ///
    /// Storage grows as blocks arrive, so a wide set costs nothing until filled.
    pub const fn new(capacity: usize) -> Self {
        Self {
            blocks: VecDeque::new(),
            capacity,
        }
    }

    /// Associativity of the set.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of blocks currently held, valid or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the set holds no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns `true` if the set holds more blocks than its associativity.
    #[inline]
    pub fn is_over_capacity(&self) -> bool {
        self.blocks.len() > self.capacity
    }

    /// Position of the valid block carrying `tag`, if any.
    pub fn position(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.valid && b.tag == tag)
    }

    /// Block at `pos`, counted from the newest end.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<&Block> {
        self.blocks.get(pos)
    }

    /// Mutable block at `pos`, counted from the newest end.
    #[inline]
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut Block> {
        self.blocks.get_mut(pos)
    }

    /// Iterates from the newest end to the oldest end.
    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    /// Moves the block at `pos` to the newest end.
    pub fn promote(&mut self, pos: usize) {
        if pos == 0 {
            return;
        }
        if let Some(block) = self.blocks.remove(pos) {
            self.blocks.push_front(block);
        }
    }

    /// Inserts a block at the newest end.
    ///
    /// The set may exceed its capacity until the caller evicts.
    pub fn push_newest(&mut self, block: Block) {
        self.blocks.push_front(block);
    }

    /// Removes and returns the block at `pos`.
    pub fn remove(&mut self, pos: usize) -> Option<Block> {
        self.blocks.remove(pos)
    }

    /// Removes and returns the valid block carrying `tag`.
    pub fn take(&mut self, tag: u64) -> Option<Block> {
        let pos = self.position(tag)?;
        self.blocks.remove(pos)
    }

    /// Marks the valid block carrying `tag` invalid and returns a copy of it.
    ///
    /// The slot stays occupied until [`CacheSet::reclaim_invalid`] runs.
    pub fn invalidate(&mut self, tag: u64) -> Option<Block> {
        let pos = self.position(tag)?;
        let block = self.blocks.get_mut(pos)?;
        let copy = block.clone();
        block.valid = false;
        Some(copy)
    }

    /// Drops every invalid block, freeing its slot.
    pub fn reclaim_invalid(&mut self) {
        self.blocks.retain(|b| b.valid);
    }

    /// Number of valid blocks.
    pub fn valid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }
}
