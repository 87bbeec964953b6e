//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache block that has not been accessed for the longest time.
//! The set itself is the usage stack: when a block is hit it is moved to the
//! front (Most Recently Used position), so the back of the set is always the
//! Least Recently Used block.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(1)
//! - **Space Complexity:** No state beyond the set order
//! - **Best Case:** Sequential/streaming accesses with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::{ReplacementPolicy, VictimContext};
use crate::core::units::cache::set::CacheSet;

/// LRU Policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Updates the set order on access.
    ///
    /// Moves the accessed block to the front of the set (MRU position),
    /// shifting the blocks ahead of it back by one.
    fn update(&mut self, set: &mut CacheSet, pos: usize) {
        set.promote(pos);
    }

    /// Identifies the victim block to evict.
    ///
    /// Returns the position at the back of the set (LRU position).
    fn get_victim(&mut self, set: &CacheSet, _ctx: &VictimContext<'_>) -> usize {
        set.len().saturating_sub(1)
    }
}
